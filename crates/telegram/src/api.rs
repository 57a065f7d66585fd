//! REST client for the Telegram Bot API.
//!
//! Every method is a `POST {api_url}/bot{token}/{method}` with a JSON body.
//! Responses share the `{ok, result, description}` envelope; failures are
//! reported with the API's own description, which callers match on for a
//! few benign cases (see [`TelegramApiError::is_not_modified`]).

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::types::{Message, OutgoingMessage, ResponseEnvelope, Update, User};

/// Default public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Extra time allowed on top of the long-poll timeout before the HTTP
/// request itself times out.
const POLL_REQUEST_GRACE: Duration = Duration::from_secs(10);

/// HTTP client for one bot.
#[derive(Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

/// Errors from the Bot API layer.
#[derive(Debug, thiserror::Error)]
pub enum TelegramApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with `ok: false`.
    #[error("Telegram API error ({status}): {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        description: String,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode Telegram response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TelegramApiError {
    /// An edit whose text and markup equal the current ones.
    pub fn is_not_modified(&self) -> bool {
        self.description_contains("message is not modified")
    }

    /// The target message no longer exists or cannot be edited.
    pub fn is_message_gone(&self) -> bool {
        self.description_contains("message to edit not found")
            || self.description_contains("message to delete not found")
            || self.description_contains("message can't be edited")
    }

    fn description_contains(&self, needle: &str) -> bool {
        matches!(self, Self::Api { description, .. } if description.contains(needle))
    }
}

impl fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramApi")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramApi {
    /// Create a client for the bot identified by `token`.
    ///
    /// * `api_url` - Base URL without trailing slash, e.g. [`DEFAULT_API_URL`].
    pub fn new(api_url: String, token: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, token: String) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            token,
        }
    }

    /// Fetch pending updates, waiting up to `timeout_secs` for new ones.
    ///
    /// `offset` is one past the last processed `update_id`; passing it
    /// acknowledges everything before it.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramApiError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        let request = self
            .request("getUpdates", &body)
            .timeout(Duration::from_secs(timeout_secs) + POLL_REQUEST_GRACE);
        Self::execute(request).await
    }

    /// Send a message to `chat_id`.
    pub async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<Message, TelegramApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            chat_id: i64,
            #[serde(flatten)]
            message: &'a OutgoingMessage,
        }

        self.call("sendMessage", &Body { chat_id, message }).await
    }

    /// Replace the text and keyboard of a message previously sent by the bot.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), TelegramApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            chat_id: i64,
            message_id: i64,
            #[serde(flatten)]
            message: &'a OutgoingMessage,
        }

        // The result is the edited message, or `true` for inline messages.
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &Body {
                    chat_id,
                    message_id,
                    message,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramApiError> {
        let body = json!({ "chat_id": chat_id, "message_id": message_id });
        let _: bool = self.call("deleteMessage", &body).await?;
        Ok(())
    }

    /// Acknowledge a callback query, optionally showing `text` as a toast.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), TelegramApiError> {
        let body = json!({ "callback_query_id": callback_query_id, "text": text });
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    /// Register `url` for update delivery. Telegram echoes `secret_token` in
    /// the `X-Telegram-Bot-Api-Secret-Token` header of every webhook call.
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), TelegramApiError> {
        let body = json!({
            "url": url,
            "secret_token": secret_token,
            "allowed_updates": ["message", "callback_query"],
        });
        let _: bool = self.call("setWebhook", &body).await?;
        Ok(())
    }

    /// Remove the webhook so that `getUpdates` can be used.
    pub async fn delete_webhook(&self) -> Result<(), TelegramApiError> {
        let _: bool = self.call("deleteWebhook", &json!({})).await?;
        Ok(())
    }

    /// The bot's own account.
    pub async fn get_me(&self) -> Result<User, TelegramApiError> {
        self.call("getMe", &json!({})).await
    }

    // ---- private helpers ----

    fn request<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/bot{}/{}", self.api_url, self.token, method))
            .json(body)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::execute(self.request(method, body)).await
    }

    /// Send the request and unwrap the response envelope.
    ///
    /// The request URL embeds the bot token, so it is stripped from
    /// transport errors before they can reach a log line.
    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, TelegramApiError> {
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| e.without_url())?;
        Self::parse_envelope(status.as_u16(), &bytes)
    }

    fn parse_envelope<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<T, TelegramApiError> {
        let envelope: ResponseEnvelope<T> = match serde_json::from_slice(bytes) {
            Ok(envelope) => envelope,
            Err(_) if !(200..300).contains(&status) => {
                return Err(TelegramApiError::Api {
                    status,
                    description: String::from_utf8_lossy(bytes).into_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        match envelope {
            ResponseEnvelope {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ResponseEnvelope {
                description,
                error_code,
                ..
            } => Err(TelegramApiError::Api {
                status: error_code.unwrap_or(status),
                description: description.unwrap_or_else(|| "<no description>".to_string()),
            }),
        }
    }
}
