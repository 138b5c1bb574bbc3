use crate::{error::{E2eError, Result},
            wait::DomProbe};
use headless_chrome::Tab;
use serde::de::DeserializeOwned;

/// Run `body` as a function of the JSON-encoded `selector` and decode the
/// JSON string it returns
fn query<T: DeserializeOwned>(tab: &Tab, selector: &str, body: &str) -> Result<T> {
    let encoded = serde_json::to_string(selector).map_err(|e| E2eError::Evaluation(e.to_string()))?;
    let js_code = format!("(function(sel) {{ {} }})({})", body, encoded);

    let result = tab.evaluate(&js_code, false).map_err(|e| E2eError::Evaluation(e.to_string()))?;

    let json_value =
        result.value.ok_or_else(|| E2eError::Evaluation(format!("No value returned for selector '{}'", selector)))?;

    // The script returns a JSON string, so parse it as a string first
    let json_str: String = serde_json::from_value(json_value)
        .map_err(|e| E2eError::Evaluation(format!("Expected a JSON string for '{}': {}", selector, e)))?;

    serde_json::from_str(&json_str)
        .map_err(|e| E2eError::Evaluation(format!("Failed to decode result for '{}': {}", selector, e)))
}

impl DomProbe for Tab {
    fn count(&self, selector: &str) -> Result<usize> {
        query(self, selector, "return JSON.stringify(document.querySelectorAll(sel).length);")
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        query(
            self,
            selector,
            r#"
                const el = document.querySelector(sel);
                if (!el) return JSON.stringify(false);
                const style = window.getComputedStyle(el);
                const shown = style.visibility !== 'hidden' && style.display !== 'none';
                return JSON.stringify(shown && el.getClientRects().length > 0);
            "#,
        )
    }

    fn text(&self, selector: &str) -> Result<Option<String>> {
        query(
            self,
            selector,
            r#"
                const el = document.querySelector(sel);
                return JSON.stringify(el ? (el.innerText || el.textContent || '').trim() : null);
            "#,
        )
    }

    fn classes(&self, selector: &str) -> Result<Option<Vec<String>>> {
        query(
            self,
            selector,
            r#"
                const el = document.querySelector(sel);
                return JSON.stringify(el ? Array.from(el.classList) : null);
            "#,
        )
    }
}
