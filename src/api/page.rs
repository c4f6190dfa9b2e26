use crate::{types::Flash, utils::escape_html};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Billboard Hot 100 to Spotify</title>
  <style>
    body { font-family: sans-serif; max-width: 36rem; margin: 3rem auto; padding: 0 1rem; }
    .flash { padding: .75rem 1rem; border-radius: .25rem; margin-bottom: 1rem; }
    .flash.success { background: #e6f4ea; color: #1e6b34; }
    .flash.error { background: #fce8e6; color: #a50e0e; }
    form { display: flex; gap: .5rem; }
  </style>
</head>
<body>
  <h1>Billboard Hot 100 to Spotify</h1>
  <p>Pick a date to turn that week's Hot 100 into a private Spotify playlist.</p>
"#;

const PAGE_FORM: &str = r#"  <form action="/create-playlist" method="post">
    <input type="date" name="date" required placeholder="YYYY-MM-DD">
    <button type="submit">Create playlist</button>
  </form>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Renders the form page with the given flash messages and, after a
/// successful build, a link to the new playlist.
pub fn render_index(flashes: &[Flash], playlist_url: Option<&str>) -> String {
    let mut html = String::from(PAGE_HEAD);

    for flash in flashes {
        html.push_str(&format!(
            "  <div class=\"flash {}\">{}</div>\n",
            flash.kind,
            escape_html(&flash.message)
        ));
    }

    html.push_str(PAGE_FORM);

    if let Some(url) = playlist_url {
        let url = escape_html(url);
        html.push_str(&format!(
            "  <p class=\"playlist\">Your playlist: <a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a></p>\n"
        ));
    }

    html.push_str(PAGE_TAIL);
    html
}
