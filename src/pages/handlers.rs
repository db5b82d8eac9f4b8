//! Landing page handler

use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use crate::auth::session::{self, FLASH_COOKIE};
use crate::auth::CurrentUser;

/// GET /
///
/// Renders the landing page: greeting and logout link when a session
/// exists, login link otherwise. A pending flash message is shown once
/// and its cookie cleared.
pub async fn index(jar: CookieJar, user: Option<CurrentUser>) -> (CookieJar, Html<String>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .map(|cookie| session::read_flash(cookie.value()));

    let jar = if flash.is_some() {
        jar.add(session::removal(FLASH_COOKIE))
    } else {
        jar
    };

    (jar, Html(render_index(user.as_ref(), flash.as_deref())))
}

pub(crate) fn render_index(user: Option<&CurrentUser>, flash: Option<&str>) -> String {
    let flash_html = match flash {
        Some(message) => format!(
            r#"<div class="flash">{}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };

    let body = match user {
        Some(user) => {
            let picture_html = match &user.picture {
                Some(picture) => format!(
                    r#"<img class="avatar" src="{}" alt="profile picture">"#,
                    escape_html(picture)
                ),
                None => String::new(),
            };
            format!(
                r#"{}
                <h1>Welcome, {}!</h1>
                <p><a href="/logout">Log out</a></p>"#,
                picture_html,
                escape_html(user.display_name()),
            )
        }
        None => r#"<h1>Welcome!</h1>
                <p><a href="/login">Log in</a></p>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Chirp</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
               max-width: 600px; margin: 50px auto; padding: 20px; }}
        .flash {{ background: #fee; border: 1px solid #fcc; padding: 12px; border-radius: 8px;
                 margin-bottom: 20px; color: #c00; }}
        .avatar {{ width: 64px; height: 64px; border-radius: 50%; }}
        a {{ color: #667eea; }}
    </style>
</head>
<body>
    {}
    {}
</body>
</html>
"#,
        flash_html, body
    )
}

/// Minimal HTML escaping for provider-supplied values.
pub(crate) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
