//! Stylesheet injection into expanded pages.
//!
//! Pages mark where CSS goes with two tokens in `<head>`:
//!
//! - `$#critical-css` becomes an inline `<style>` block.
//! - `$#non-critical-css` becomes a preload link to the site-wide stylesheet,
//!   with a `<noscript>` fallback.
//!
//! A page with neither token gets both tags injected before `</head>`, after
//! `<head>` when there is no closing tag, or at the very top otherwise.

use crate::types::{CRITICAL_CSS_PLACEHOLDER, NON_CRITICAL_CSS_FILENAME, NON_CRITICAL_CSS_PLACEHOLDER};
use maud::{PreEscaped, html};

/// Replace the CSS placeholders in `html`. Only the first occurrence of each
/// token is replaced. Empty CSS renders as an empty tag string.
pub fn replace_placeholders(html: &str, critical_css: &str, non_critical_css: &str, base_path: &str) -> String {
    let has_critical = html.contains(CRITICAL_CSS_PLACEHOLDER);
    let has_non_critical = html.contains(NON_CRITICAL_CSS_PLACEHOLDER);

    let critical_tag = render_critical_tag(critical_css);
    let non_critical_tag = render_non_critical_tag(non_critical_css, &stylesheet_href(base_path));

    let mut result = html.to_string();
    if has_critical {
        result = result.replacen(CRITICAL_CSS_PLACEHOLDER, &critical_tag, 1);
    }
    if has_non_critical {
        result = result.replacen(NON_CRITICAL_CSS_PLACEHOLDER, &non_critical_tag, 1);
    }

    if !has_critical && !has_non_critical && (!critical_css.is_empty() || !non_critical_css.is_empty()) {
        let injection = format!("{critical_tag}{non_critical_tag}");
        result = if result.contains("</head>") {
            result.replacen("</head>", &format!("{injection}\n</head>"), 1)
        } else if result.contains("<head>") {
            result.replacen("<head>", &format!("<head>\n{injection}"), 1)
        } else {
            format!("{injection}\n{result}")
        };
    }

    result
}

/// URL of the site-wide stylesheet under `base_path`.
pub fn stylesheet_href(base_path: &str) -> String {
    if base_path.is_empty() {
        NON_CRITICAL_CSS_FILENAME.to_string()
    } else {
        format!("{}/{NON_CRITICAL_CSS_FILENAME}", base_path.trim_end_matches('/'))
    }
}

fn render_critical_tag(css: &str) -> String {
    if css.is_empty() {
        return String::new();
    }
    html! { style { (PreEscaped(css)) } }.into_string()
}

fn render_non_critical_tag(css: &str, href: &str) -> String {
    if css.is_empty() {
        return String::new();
    }
    html! {
        link rel="preload" href=(href) as="style" onload="this.onload=null;this.rel='stylesheet'";
        noscript {
            link rel="stylesheet" href=(href);
        }
    }
    .into_string()
}
