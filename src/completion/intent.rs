use crate::{error::AppError, warning};

use super::CompletionClient;

/// What a chat message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Music recommendations or a playlist (`recs`).
    Recommendation,
    /// The user's own top tracks (`tracks`).
    TopTracks,
    /// Anything else (`no`).
    None,
}

impl Intent {
    /// Maps a classifier reply to an intent.
    ///
    /// Surrounding whitespace, quotes and punctuation are ignored and the
    /// label is matched case-insensitively. Any other reply is `None`.
    pub fn from_label(label: &str) -> Self {
        let label = label
            .trim()
            .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
            .to_ascii_lowercase();

        match label.as_str() {
            "recs" => Intent::Recommendation,
            "tracks" => Intent::TopTracks,
            "no" => Intent::None,
            _ => {
                warning!("Unexpected classifier reply '{}', treating as no intent", label);
                Intent::None
            }
        }
    }
}

/// Instruction sent to the model to label `message`.
pub fn classifier_prompt(message: &str) -> String {
    format!(
        "Does this prompt have anything to do with asking for music recommendations or making a playlist? \
         If it does, simply say 'recs'. If it has anything to do with asking for top songs or tracks \
         (Ex. What are my top tracks? What are my top songs?), simply say 'tracks'. \
         If it is neither, simply say 'no' - Prompt:'{message}'"
    )
}

/// Asks the model what `message` is about. No retry on an odd reply.
pub async fn classify(client: &CompletionClient, message: &str) -> Result<Intent, AppError> {
    let reply = client.complete(&classifier_prompt(message)).await?;
    Ok(Intent::from_label(&reply))
}
