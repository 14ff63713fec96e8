//! Landing page with a small translation form

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::server::api::AppState;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Translate Gateway</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
    textarea { width: 100%; height: 8rem; }
    .row { display: flex; gap: 1rem; margin: 0.5rem 0; }
  </style>
{{analytics}}</head>
<body>
  <h1>Translate Gateway</h1>
  <div class="row">
    <select id="source"></select>
    <select id="target"></select>
    <button id="go">Translate</button>
  </div>
  <textarea id="q" placeholder="Text to translate"></textarea>
  <textarea id="out" readonly></textarea>
  <p><a href="/docs">API documentation</a></p>
  <script>
    const $ = (id) => document.getElementById(id);
    fetch("/languages").then((r) => r.json()).then((langs) => {
      for (const l of langs) {
        for (const sel of [$("source"), $("target")]) {
          sel.add(new Option(l.name, l.code));
        }
      }
      if (langs.length > 1) { $("target").selectedIndex = 1; }
    });
    $("go").onclick = async () => {
      const res = await fetch("/translate", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ q: $("q").value, source: $("source").value, target: $("target").value }),
      });
      const body = await res.json();
      $("out").value = res.ok ? body.translatedText : body.error;
    };
  </script>
</body>
</html>
"#;

/// Render the landing page, with the analytics tag only when an id is set
pub fn render_index(google_analytics: Option<&str>) -> String {
    let analytics = google_analytics
        .map(|id| {
            // Ids look like "UA-12345-1" or "G-ABC123"; drop anything else.
            let id: String = id
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            format!(
                concat!(
                    "  <script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n",
                    "  <script>window.dataLayer = window.dataLayer || [];",
                    " function gtag(){{dataLayer.push(arguments);}}",
                    " gtag('js', new Date()); gtag('config', '{id}');</script>\n"
                ),
                id = id
            )
        })
        .unwrap_or_default();

    INDEX_TEMPLATE.replace("{{analytics}}", &analytics)
}

/// `GET /`
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_index(state.settings.google_analytics.as_deref()))
}
