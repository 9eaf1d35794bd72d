//! Gemini `generateContent` REST client.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use iesgo_shared::types::User;

use super::{AiCollaborator, Selfie, Verdict, ICEBREAKER_EMPTY, ICEBREAKER_ON_ERROR, VERIFY_ERROR_REASON};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini answered {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed model output: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AiError> {
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AiError::Status(resp.status()));
        }

        let body: GenerateResponse = resp.json().await?;
        Ok(body.text())
    }

    async fn try_icebreaker(&self, me: &User, candidate: &User) -> Result<String, AiError> {
        let prompt = icebreaker_prompt(me, candidate);
        let request = GenerateRequest {
            contents: vec![Content::user(vec![Part::text(&prompt)])],
            generation_config: None,
        };
        let text = self.generate(&request).await?;
        let text = text.trim();

        Ok(if text.is_empty() {
            ICEBREAKER_EMPTY.to_string()
        } else {
            text.to_string()
        })
    }

    /// Download the profile photo. `None` when it cannot be fetched, which
    /// downgrades the check to "is this a legible face".
    async fn fetch_photo(&self, url: &str) -> Option<InlineData> {
        let result: Result<InlineData, AiError> = async {
            let resp = self.http.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(AiError::Status(resp.status()));
            }
            let mime_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .filter(|v| v.starts_with("image/"))
                .unwrap_or("image/jpeg")
                .to_string();
            let bytes = resp.bytes().await?;
            Ok(InlineData {
                mime_type,
                data: STANDARD.encode(&bytes),
            })
        }
        .await;

        match result {
            Ok(data) if !data.data.is_empty() => Some(data),
            Ok(_) => None,
            Err(e) => {
                warn!(url, error = %e, "could not fetch profile photo, falling back to face check");
                None
            }
        }
    }

    async fn try_verify(&self, profile_photo_url: &str, selfie: &Selfie) -> Result<Verdict, AiError> {
        let mut parts = vec![Part::inline(InlineData {
            mime_type: selfie.mime_type.clone(),
            data: selfie.to_base64(),
        })];

        let prompt = match self.fetch_photo(profile_photo_url).await {
            Some(photo) => {
                parts.push(Part::inline(photo));
                COMPARE_PROMPT
            }
            None => FACE_ONLY_PROMPT,
        };
        parts.push(Part::text(prompt));

        let request = GenerateRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig::verdict_schema()),
        };
        let text = self.generate(&request).await?;
        parse_verdict(&text)
    }
}

impl AiCollaborator for GeminiClient {
    fn generate_icebreaker<'a>(
        &'a self,
        me: &'a User,
        candidate: &'a User,
    ) -> BoxFuture<'a, String> {
        async move {
            match self.try_icebreaker(me, candidate).await {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "icebreaker generation failed");
                    ICEBREAKER_ON_ERROR.to_string()
                }
            }
        }
        .boxed()
    }

    fn verify_identity<'a>(
        &'a self,
        profile_photo_url: &'a str,
        selfie: &'a Selfie,
    ) -> BoxFuture<'a, Verdict> {
        async move {
            match self.try_verify(profile_photo_url, selfie).await {
                Ok(verdict) => {
                    debug!(verified = verdict.verified, "identity verification answered");
                    verdict
                }
                Err(e) => {
                    error!(error = %e, "identity verification failed");
                    Verdict::new(false, VERIFY_ERROR_REASON)
                }
            }
        }
        .boxed()
    }
}

const COMPARE_PROMPT: &str = "Analyze these two images. Image 1 is a live selfie, image 2 is a \
    profile picture. Do they show the same person? Be lenient with lighting and angle \
    differences. Answer with a JSON object holding a boolean 'match' and a string 'reason'.";

const FACE_ONLY_PROMPT: &str = "Analyze this image. Is it a clear photo of a human face, \
    suitable for identity verification? Answer with a JSON object holding a boolean 'match' \
    (true when it is a clear face) and a string 'reason'.";

fn icebreaker_prompt(me: &User, candidate: &User) -> String {
    format!(
        "You are a friendly dating coach for IESGO Connect, a college app. \
         Write one short, fun and polite icebreaker in Brazilian Portuguese for User A to send to User B.\n\
         User A: course {}, interests {}.\n\
         User B: name {}, course {}, interests {}, bio \"{}\".\n\
         Keep it casual, build on common ground or User B's bio, and end with a question. \
         No surrounding quotes, at most 2 sentences.",
        me.course.as_deref().unwrap_or("N/A"),
        me.interests.join(", "),
        candidate.name,
        candidate.course.as_deref().unwrap_or("N/A"),
        candidate.interests.join(", "),
        candidate.bio,
    )
}

fn parse_verdict(text: &str) -> Result<Verdict, AiError> {
    let text = text.trim();
    let raw: RawVerdict = if text.is_empty() {
        RawVerdict::default()
    } else {
        serde_json::from_str(text)?
    };
    Ok(Verdict::new(raw.is_match, raw.reason))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn user(parts: Vec<Part<'a>>) -> Self {
        Self { role: "user", parts }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl<'a> Part<'a> {
    fn text(text: &'a str) -> Self {
        Self::Text { text }
    }

    fn inline(inline_data: InlineData) -> Self {
        Self::Inline { inline_data }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

impl GenerationConfig {
    fn verdict_schema() -> Self {
        Self {
            response_mime_type: "application/json",
            response_schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "match": { "type": "BOOLEAN" },
                    "reason": { "type": "STRING" }
                }
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVerdict {
    #[serde(default, rename = "match")]
    is_match: bool,
    #[serde(default)]
    reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use iesgo_shared::catalog::{default_profile, Catalog};
    use iesgo_shared::types::UserId;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    #[test]
    fn test_prompt_mentions_both_sides() {
        let me = default_profile("eu@iesgo.edu.br");
        let fernanda = Catalog::seed().get_or_placeholder(&UserId::from("user_6"));
        let prompt = icebreaker_prompt(&me, &fernanda);

        assert!(prompt.contains("Administração"));
        assert!(prompt.contains("Fernanda Costa"));
        assert!(prompt.contains("Psicanálise"));
        assert!(prompt.contains(&fernanda.bio));
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateRequest {
            contents: vec![Content::user(vec![
                Part::inline(InlineData {
                    mime_type: "image/jpeg".into(),
                    data: "AAAA".into(),
                }),
                Part::text("hello"),
            ])],
            generation_config: Some(GenerationConfig::verdict_schema()),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            json["generationConfig"]["responseSchema"]["properties"]["match"]["type"],
            "BOOLEAN"
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Oi, "},{"text":"tudo bem?"}]}}]}"#;
        let resp: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.text(), "Oi, tudo bem?");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_parse_verdict() {
        let v = parse_verdict(r#"{"match": true, "reason": "Mesma pessoa"}"#).unwrap();
        assert_eq!(v, Verdict::new(true, "Mesma pessoa"));

        // missing fields read as a negative verdict
        assert_eq!(parse_verdict("").unwrap(), Verdict::new(false, ""));
        assert_eq!(parse_verdict("{}").unwrap(), Verdict::new(false, ""));

        assert!(parse_verdict("not json").is_err());
    }

    /// A port that was just free; nothing listens on it.
    async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_fallbacks() {
        let base = closed_port_url().await;
        let client = GeminiClient::new("test-key".into(), "gemini-2.5-flash".into(), base.clone());
        let me = default_profile("eu@iesgo.edu.br");
        let ana = Catalog::seed().get_or_placeholder(&UserId::from("user_2"));

        assert_eq!(client.generate_icebreaker(&me, &ana).await, ICEBREAKER_ON_ERROR);

        let selfie = Selfie::new("image/jpeg", vec![0xFF, 0xD8]);
        let verdict = client
            .verify_identity(&format!("{base}/photo.jpg"), &selfie)
            .await;
        assert_eq!(verdict, Verdict::new(false, VERIFY_ERROR_REASON));
    }

    // -----------------------------------------------------------------------
    // Local HTTP stand-in for the photo host and the Gemini endpoint
    // -----------------------------------------------------------------------

    const PHOTO_BYTES: &[u8] = b"\x89PNG-profile";

    /// One captured `generateContent` call: lowercased request head and
    /// parsed JSON body.
    struct Captured {
        head: String,
        body: Value,
    }

    /// Serve `GET` with the profile photo (404 when `photo` is `None`) and
    /// answer every `POST` with a single candidate whose text is
    /// `model_text`. Returns the base URL and the captured POSTs.
    async fn stub_backend(
        photo: Option<&'static [u8]>,
        model_text: &'static str,
    ) -> (String, mpsc::UnboundedReceiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                tokio::spawn(serve_one(sock, photo, model_text, tx.clone()));
            }
        });

        (format!("http://{addr}"), rx)
    }

    async fn serve_one(
        mut sock: TcpStream,
        photo: Option<&'static [u8]>,
        model_text: &'static str,
        tx: mpsc::UnboundedSender<Captured>,
    ) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let (status, content_type, payload) = if head.starts_with("post") {
            let body: Value = serde_json::from_slice(&buf[header_end..]).unwrap();
            tx.send(Captured { head, body }).unwrap();
            let reply = json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": model_text }] } }]
            });
            ("200 OK", "application/json", reply.to_string().into_bytes())
        } else {
            match photo {
                Some(bytes) => ("200 OK", "image/png", bytes.to_vec()),
                None => ("404 Not Found", "text/plain", b"not found".to_vec()),
            }
        };

        let response_head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            payload.len()
        );
        sock.write_all(response_head.as_bytes()).await.unwrap();
        sock.write_all(&payload).await.unwrap();
        let _ = sock.shutdown().await;
    }

    fn client_for(base: &str) -> GeminiClient {
        GeminiClient::new("test-key".into(), "gemini-2.5-flash".into(), base.to_string())
    }

    fn parts(captured: &Captured) -> &Vec<Value> {
        captured.body["contents"][0]["parts"].as_array().unwrap()
    }

    fn inline_count(captured: &Captured) -> usize {
        parts(captured)
            .iter()
            .filter(|p| p.get("inlineData").is_some())
            .count()
    }

    #[tokio::test]
    async fn test_missing_photo_falls_back_to_face_check() {
        let (base, mut calls) = stub_backend(None, r#"{"match": true, "reason": "rosto ok"}"#).await;
        let client = client_for(&base);
        let selfie = Selfie::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);

        let verdict = client
            .verify_identity(&format!("{base}/photo.png"), &selfie)
            .await;
        assert_eq!(verdict, Verdict::new(true, "rosto ok"));

        let call = calls.recv().await.unwrap();
        assert!(call.head.starts_with("post /v1beta/models/gemini-2.5-flash:generatecontent"));
        assert!(call.head.contains("x-goog-api-key: test-key"));
        assert_eq!(inline_count(&call), 1);
        assert_eq!(parts(&call)[0]["inlineData"]["data"], selfie.to_base64());
        assert_eq!(parts(&call).last().unwrap()["text"], FACE_ONLY_PROMPT);
        assert_eq!(call.body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_fetched_photo_is_compared_with_selfie() {
        let (base, mut calls) =
            stub_backend(Some(PHOTO_BYTES), r#"{"match": false, "reason": "Pessoas diferentes"}"#).await;
        let client = client_for(&base);
        let selfie = Selfie::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);

        let verdict = client
            .verify_identity(&format!("{base}/photo.png"), &selfie)
            .await;
        assert_eq!(verdict, Verdict::new(false, "Pessoas diferentes"));

        let call = calls.recv().await.unwrap();
        assert_eq!(inline_count(&call), 2);
        let photo = &parts(&call)[1]["inlineData"];
        assert_eq!(photo["mimeType"], "image/png");
        assert_eq!(photo["data"], STANDARD.encode(PHOTO_BYTES));
        assert_eq!(parts(&call).last().unwrap()["text"], COMPARE_PROMPT);
    }

    #[tokio::test]
    async fn test_malformed_verdict_is_a_technical_error() {
        let (base, _calls) = stub_backend(Some(PHOTO_BYTES), "isso não é json").await;
        let verdict = client_for(&base)
            .verify_identity(&format!("{base}/photo.png"), &Selfie::new("image/jpeg", vec![1]))
            .await;
        assert_eq!(verdict, Verdict::new(false, VERIFY_ERROR_REASON));
    }

    #[tokio::test]
    async fn test_blank_icebreaker_uses_default_greeting() {
        let (base, mut calls) = stub_backend(None, "   ").await;
        let me = default_profile("eu@iesgo.edu.br");
        let ana = Catalog::seed().get_or_placeholder(&UserId::from("user_2"));

        let text = client_for(&base).generate_icebreaker(&me, &ana).await;
        assert_eq!(text, ICEBREAKER_EMPTY);

        let call = calls.recv().await.unwrap();
        assert_eq!(inline_count(&call), 0);
        assert!(call.body.get("generationConfig").is_none());
        let prompt = parts(&call)[0]["text"].as_str().unwrap();
        assert!(prompt.contains("Ana Silva"));
    }

    #[tokio::test]
    async fn test_icebreaker_text_is_trimmed() {
        let (base, _calls) = stub_backend(None, "  Oi Ana! Bora pro barzinho?\n").await;
        let me = default_profile("eu@iesgo.edu.br");
        let ana = Catalog::seed().get_or_placeholder(&UserId::from("user_2"));

        let text = client_for(&base).generate_icebreaker(&me, &ana).await;
        assert_eq!(text, "Oi Ana! Bora pro barzinho?");
    }
}
