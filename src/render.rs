//! HTML shell rendering.
//!
//! Pages are not server-rendered. The shell carries the loaded `PageData` as a
//! JSON island that the client bundle reads on boot.

use axum::response::Html;

use crate::error::PageError;
use crate::loader::PageData;

pub const PAGE_DATA_ELEMENT_ID: &str = "page-data";
const APP_TITLE: &str = "FreudBot";

/// Render the page shell with `data` embedded.
///
/// # Errors
///
/// Returns [`PageError::Render`] if `data` cannot be serialized.
pub fn page_shell(data: &PageData) -> Result<Html<String>, PageError> {
    let island = json_island(data)?;
    Ok(Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{APP_TITLE}</title>\n\
         <script type=\"application/json\" id=\"{PAGE_DATA_ELEMENT_ID}\">{island}</script>\n\
         </head>\n\
         <body>\n\
         <div id=\"app\"></div>\n\
         </body>\n\
         </html>\n"
    )))
}

/// Static page for visitors the auth gate turned away.
#[must_use]
pub fn unauthorized_page() -> Html<&'static str> {
    Html(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Unauthorized</title></head>\n\
         <body>\n\
         <h1>Unauthorized</h1>\n\
         <p>You need to <a href=\"/login\">log in</a> to see this page.</p>\n\
         </body>\n\
         </html>\n",
    )
}

/// Serialize `data` so it can sit inside a `<script>` element. `<` is
/// escaped so no string in the payload can close the element early.
fn json_island(data: &PageData) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(data)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn island_of(html: &str) -> &str {
        let open = format!("id=\"{PAGE_DATA_ELEMENT_ID}\">");
        let start = html.find(&open).unwrap() + open.len();
        let end = start + html[start..].find("</script>").unwrap();
        &html[start..end]
    }

    #[test]
    fn shell_embeds_user_data() {
        let Html(html) = page_shell(&PageData { user_data: json!({"name": "alice"}) }).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(island_of(&html)).unwrap();
        assert_eq!(parsed, json!({"user_data": {"name": "alice"}}));
    }

    #[test]
    fn shell_escapes_script_terminators() {
        let Html(html) = page_shell(&PageData { user_data: json!({"name": "</script><script>alert(1)"}) }).unwrap();
        let island = island_of(&html);
        assert!(!island.contains('<'));
        let parsed: serde_json::Value = serde_json::from_str(island).unwrap();
        assert_eq!(parsed["user_data"]["name"], "</script><script>alert(1)");
    }

    #[test]
    fn shell_is_a_full_document() {
        let Html(html) = page_shell(&PageData { user_data: serde_json::Value::Null }).unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>FreudBot</title>"));
    }

    #[test]
    fn island_is_the_serialized_page_data() {
        let data = PageData { user_data: json!({"id": 7, "tags": ["a<b"]}) };
        let island = json_island(&data).unwrap();
        assert_eq!(island, r#"{"user_data":{"id":7,"tags":["a\u003cb"]}}"#);
    }

    #[test]
    fn unauthorized_page_links_to_login() {
        let Html(html) = unauthorized_page();
        assert!(html.contains("href=\"/login\""));
    }
}
