use axum::response::Html;

/// Landing page with the login link.
pub async fn index() -> Html<&'static str> {
    Html("<h1>Welcome to MusicGPT by RIT AI</h1> <a href='/login'>Login with Spotify</a>")
}
