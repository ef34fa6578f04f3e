//! Headless Chrome driven over the DevTools protocol.

use super::{BrowserError, Element, Locator, Result, Session};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element as CdpElement, Page};
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Launch options for [`ChromeSession::launch`].
#[derive(Debug, Clone)]
pub struct LaunchOptions<'a> {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub executable: Option<&'a Path>,
}

/// A single Chrome process with one page.
///
/// Dropping the session aborts the protocol handler, which also tears the
/// child process down; [`Session::close`] does the same gracefully.
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(options: LaunchOptions<'_>) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_size.0, options.window_size.1)
            .arg("--disable-gpu");
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!(error = %e, "browser handler event failed");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        debug!("browser session started");
        Ok(Self {
            browser: Some(browser),
            page,
            handler,
        })
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl Session for ChromeSession {
    type Element = ChromeElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ChromeElement>> {
        let elements = match locator {
            Locator::XPath(expr) => self.page.find_xpaths(expr.as_str()).await,
            other => {
                let css = other
                    .to_css()
                    .ok_or_else(|| BrowserError::Unsupported(other.to_string()))?;
                self.page.find_elements(css).await
            }
        };
        Ok(into_elements(elements)?)
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "failed waiting for browser process to exit");
        }
        self.handler.abort();
        closed?;
        debug!("browser session closed");
        Ok(())
    }
}

/// Zero matches are reported by the driver as an error; treat them as empty.
fn into_elements(
    found: std::result::Result<Vec<CdpElement>, chromiumoxide::error::CdpError>,
) -> Result<Vec<ChromeElement>> {
    match found {
        Ok(elements) => Ok(elements.into_iter().map(ChromeElement).collect()),
        Err(chromiumoxide::error::CdpError::NotFound) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub struct ChromeElement(CdpElement);

impl ChromeElement {
    /// Run `function() { ... }` with `this` bound to the element.
    async fn call(&self, function: String) -> Result<Option<serde_json::Value>> {
        let returns = self.0.call_js_fn(function, false).await?;
        if let Some(details) = returns.exception_details {
            return Err(BrowserError::Script(details.text));
        }
        Ok(returns.result.value)
    }
}

/// Quote a Rust string as a JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

#[async_trait]
impl Element for ChromeElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>> {
        let css = locator
            .to_css()
            .ok_or_else(|| BrowserError::Unsupported(format!("scoped {locator}")))?;
        into_elements(self.0.find_elements(css).await)
    }

    async fn inner_html(&self) -> Result<String> {
        Ok(self.0.inner_html().await?.unwrap_or_default())
    }

    async fn text(&self) -> Result<String> {
        Ok(self.0.inner_text().await?.unwrap_or_default())
    }

    async fn set_value(&self, value: &str) -> Result<()> {
        self.call(format!(
            "function() {{
                this.value = {value};
                this.dispatchEvent(new Event('input', {{ bubbles: true }}));
                this.dispatchEvent(new Event('change', {{ bubbles: true }}));
            }}",
            value = js_string(value)
        ))
        .await?;
        Ok(())
    }

    async fn clear_and_type(&self, text: &str) -> Result<()> {
        self.call("function() { this.value = ''; }".to_string())
            .await?;
        self.0.click().await?;
        self.0.type_str(text).await?;
        Ok(())
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<()> {
        let selected = self
            .call(format!(
                "function() {{
                    const wanted = {text};
                    const option = Array.from(this.options || [])
                        .find(o => o.text.trim() === wanted);
                    if (!option) return false;
                    this.value = option.value;
                    option.selected = true;
                    this.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }}",
                text = js_string(text)
            ))
            .await?;
        match selected {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            _ => Err(BrowserError::NotFound(format!("option with text {text:?}"))),
        }
    }

    async fn click(&self) -> Result<()> {
        self.0.click().await?;
        Ok(())
    }

    async fn is_clickable(&self) -> Result<bool> {
        let clickable = self
            .call(
                "function() {
                    const style = window.getComputedStyle(this);
                    const visible = this.getClientRects().length > 0
                        && style.visibility !== 'hidden'
                        && style.display !== 'none';
                    return visible && !this.disabled;
                }"
                .to_string(),
            )
            .await?;
        Ok(matches!(clickable, Some(serde_json::Value::Bool(true))))
    }

    async fn scroll_top(&self) -> Result<i64> {
        let value = self
            .call("function() { return Math.round(this.scrollTop); }".to_string())
            .await?;
        value
            .as_ref()
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| BrowserError::Script(format!("scrollTop was {value:?}")))
    }

    async fn scroll_by(&self, dy: i64) -> Result<()> {
        self.call(format!("function() {{ this.scrollTop += {dy}; }}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_strings_are_escaped() {
        assert_eq!(js_string("교과목명"), "\"교과목명\"");
        assert_eq!(js_string("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(js_string("line\nbreak"), r#""line\nbreak""#);
    }
}
