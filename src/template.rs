//! Gallery template rendering
//!
//! The template is read from disk on every render so edits show up without a
//! restart.

use std::path::Path;

use minijinja::{context, AutoEscape, Environment, Value};
use tokio::fs;

use crate::error::{Error, Result};

/// Render the gallery template at `template_path`
///
/// The template sees `images` (filenames, in listing order) and
/// `images_path` (URL prefix the files are served under).
pub async fn render_gallery(
    template_path: &Path,
    images: &[String],
    images_path: &str,
) -> Result<String> {
    let source = fs::read_to_string(template_path).await.map_err(|e| {
        Error::Template(format!("cannot read {}: {e}", template_path.display()))
    })?;

    render_source(&source, images, images_path)
}

/// Render an already-loaded template source
pub fn render_source(source: &str, images: &[String], images_path: &str) -> Result<String> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);

    // The prefix is server configuration, not user input
    let images_path = Value::from_safe_string(images_path.to_string());
    let html = env.render_str(source, context! { images, images_path })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str =
        "{% for name in images %}<img src=\"{{ images_path }}{{ name }}\">{% endfor %}";

    #[test]
    fn test_render_one_tag_per_image() {
        let images = vec!["a.png".to_string(), "b.jpeg".to_string()];
        let html = render_source(TEMPLATE, &images, "/images/").unwrap();
        assert_eq!(
            html,
            "<img src=\"/images/a.png\"><img src=\"/images/b.jpeg\">"
        );
    }

    #[test]
    fn test_render_escapes_names() {
        let images = vec!["<x>.png".to_string()];
        let html = render_source(TEMPLATE, &images, "/images/").unwrap();
        assert!(html.contains("&lt;x&gt;.png"));
    }

    #[test]
    fn test_invalid_template_is_template_error() {
        let err = render_source("{% for %}", &[], "/images/").unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[tokio::test]
    async fn test_missing_template_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = render_gallery(&tmp.path().join("index.html.tmpl"), &[], "/images/")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
        assert_eq!(err.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
