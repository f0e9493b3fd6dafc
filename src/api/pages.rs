use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension,
};

use crate::{
    error::AppResult,
    models::{SessionData, UserSlot},
    session::SessionId,
};

use super::{handlers::load_session, AppState};

/// Base URL for catalog backdrop images
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const STYLE: &str = r#"
body { background: #141414; color: #fff; font-family: sans-serif; margin: 0; padding: 2rem; }
main { max-width: 960px; margin: 0 auto; }
.panels { display: flex; gap: 1.5rem; flex-wrap: wrap; }
.panel { flex: 1; min-width: 280px; background: #1f1f1f; border-radius: 8px; padding: 1rem; }
input { width: 100%; padding: .5rem; box-sizing: border-box; }
button { background: #e50914; color: #fff; border: 0; padding: .6rem 1rem; border-radius: 4px; cursor: pointer; }
button:disabled { background: #555; }
ul { list-style: none; padding: 0; }
li { padding: .4rem 0; border-bottom: 1px solid #333; cursor: pointer; }
.muted { color: #999; }
#match img { max-width: 100%; border-radius: 8px; }
"#;

const INDEX_SCRIPT: &str = r#"
const IMAGE_BASE = "https://image.tmdb.org/t/p/w500";
const chosen = {};
const timers = {};

async function postJson(url, body) {
  const response = await fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  return { ok: response.ok, data: await response.json() };
}

function render(list, text) {
  list.innerHTML = "";
  const item = document.createElement("li");
  item.className = "muted";
  item.textContent = text;
  list.appendChild(item);
}

async function search(user, query) {
  const list = document.getElementById(user + "-results");
  if (query.length < 2) { render(list, "Type to search for a movie..."); return; }
  render(list, "Searching...");
  const { data } = await postJson("/api/search-movie", { query });
  if (data.error) { render(list, data.error); return; }
  list.innerHTML = "";
  for (const movie of data.results) {
    const item = document.createElement("li");
    item.textContent = `${movie.title} (${movie.year}) - ${movie.rating}`;
    item.onclick = () => select(user, movie);
    list.appendChild(item);
  }
}

async function select(user, movie) {
  const { ok, data } = await postJson("/api/select-movie", { user, movie });
  if (!ok) { alert(data.error); return; }
  chosen[user] = movie;
  document.getElementById(user + "-selected").textContent = movie.title;
  document.getElementById("find").disabled = !(chosen.user1 && chosen.user2);
}

async function findMatch() {
  const target = document.getElementById("match");
  target.textContent = "Finding a match...";
  const { ok, data } = await postJson("/api/find-match");
  if (!ok) { target.textContent = data.error; return; }
  target.innerHTML = "";
  const title = document.createElement("h2");
  title.textContent = data.recommended_movie;
  const reason = document.createElement("p");
  reason.textContent = data.reason;
  target.append(title, reason);
  if (data.backdrop_path) {
    const image = document.createElement("img");
    image.src = IMAGE_BASE + data.backdrop_path;
    image.alt = data.recommended_movie;
    target.appendChild(image);
  }
}

for (const user of ["user1", "user2"]) {
  document.getElementById(user + "-search").addEventListener("input", (event) => {
    clearTimeout(timers[user]);
    const query = event.target.value.trim();
    timers[user] = setTimeout(() => search(user, query), 300);
  });
}
document.getElementById("find").addEventListener("click", findMatch);
"#;

/// Escapes text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn user_panel(user: UserSlot, heading: &str) -> String {
    format!(
        r#"<section class="panel">
<h2>{heading}</h2>
<input id="{user}-search" type="search" placeholder="Search for a movie" autocomplete="off">
<p>Selected: <strong id="{user}-selected" class="muted">nothing yet</strong></p>
<ul id="{user}-results"><li class="muted">Type to search for a movie...</li></ul>
</section>"#
    )
}

/// Home page
pub async fn index() -> Html<String> {
    let body = format!(
        "<h1>Movie Match</h1>\n<p class=\"muted\">Each of you picks a movie, then we find one you will both enjoy.</p>\n\
         <div class=\"panels\">\n{}\n{}\n</div>\n\
         <p><button id=\"find\" disabled>Find our match</button> <a href=\"/results\" class=\"muted\">View selections</a></p>\n\
         <section id=\"match\"></section>\n<script>{}</script>",
        user_panel(UserSlot::User1, "Start with you"),
        user_panel(UserSlot::User2, "Continue with your friend"),
        INDEX_SCRIPT
    );

    Html(layout("Movie Match", &body))
}

fn selection_row(data: &SessionData, user: UserSlot, label: &str) -> String {
    let Some(movie) = data.selection(user) else {
        return format!(
            "<li><strong>{}</strong>: <span class=\"muted\">not selected yet</span></li>",
            label
        );
    };

    let title = data.selected_title(user).unwrap_or_default();
    let year = movie
        .get("year")
        .map(|y| match y.as_str() {
            Some(s) => s.to_string(),
            None => y.to_string(),
        })
        .map(|y| format!(" ({})", escape_html(&y)))
        .unwrap_or_default();
    let image = movie
        .get("backdrop_path")
        .and_then(|p| p.as_str())
        .map(|p| {
            format!(
                "<br><img src=\"{}{}\" alt=\"{}\" width=\"300\">",
                IMAGE_BASE_URL,
                escape_html(p),
                escape_html(&title)
            )
        })
        .unwrap_or_default();

    format!(
        "<li><strong>{}</strong>: {}{}{}</li>",
        label,
        escape_html(&title),
        year,
        image
    )
}

/// Results page listing the current session's selections
pub async fn results(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Html<String>> {
    let data = load_session(&state, &session).await?;

    let body = format!(
        "<h1>Your selections</h1>\n<ul>\n{}\n{}\n</ul>\n<p><a href=\"/\">Back to search</a></p>",
        selection_row(&data, UserSlot::User1, "You"),
        selection_row(&data, UserSlot::User2, "Your friend"),
    );

    Ok(Html(layout("Movie Match - Results", &body)))
}

/// Fallback for unrouted paths
pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(layout(
            "Page not found",
            "<h1>404</h1>\n<p>The page you are looking for does not exist.</p>\n<p><a href=\"/\">Go home</a></p>",
        )),
    )
}
