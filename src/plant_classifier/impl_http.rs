use crate::detection::model::DetectionResult;
use crate::detection::normalize::normalize_str;
use crate::image_file::EncodedImage;
use crate::library::logger::interface::Logger;
use crate::plant_classifier::interface::{ClassifyError, PlantClassifier};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Posts the image to a hosted classification workflow.
pub struct PlantClassifierHttp {
    agent: ureq::Agent,
    api_url: String,
    api_key: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl PlantClassifierHttp {
    pub fn new(
        api_url: &str,
        api_key: &str,
        timeout: Duration,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            logger: logger.with_namespace("plant_classifier").with_namespace("http"),
        }
    }
}

pub fn request_body(api_key: &str, image: &EncodedImage) -> serde_json::Value {
    json!({
        "api_key": api_key,
        "inputs": {
            "image": {
                "type": "base64",
                "value": image.payload().unwrap_or_else(|| image.as_str()),
            }
        }
    })
}

impl PlantClassifier for PlantClassifierHttp {
    fn classify(&self, image: &EncodedImage) -> Result<DetectionResult, ClassifyError> {
        let _ = self.logger.info(&format!("POST {}", self.api_url));

        let response = match self
            .agent
            .post(&self.api_url)
            .set("Content-Type", "application/json")
            .send_json(request_body(&self.api_key, image))
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => return Err(ClassifyError::Api { status }),
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClassifyError::Transport(transport.to_string()))
            }
        };

        if response.status() != 200 {
            return Err(ClassifyError::Api {
                status: response.status(),
            });
        }

        let body = response
            .into_string()
            .map_err(|e| ClassifyError::Transport(e.to_string()))?;
        let _ = self
            .logger
            .info(&format!("response: {} bytes", body.len()));

        Ok(normalize_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    /// Answers a single request with `status` and `body`, handing back the
    /// request body it received.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/infer", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            tx.send(String::from_utf8(request_body).unwrap()).unwrap();
        });

        (url, rx)
    }

    fn classifier(url: &str) -> PlantClassifierHttp {
        PlantClassifierHttp::new(url, "secret", Duration::from_secs(5), Arc::new(LoggerFake::new()))
    }

    #[test]
    fn test_request_body_strips_data_url_prefix() {
        let image = EncodedImage::new("data:image/jpeg;base64,AQID");
        let body = request_body("secret", &image);

        assert_eq!(
            body,
            json!({
                "api_key": "secret",
                "inputs": {"image": {"type": "base64", "value": "AQID"}}
            })
        );
    }

    #[test]
    fn test_classify_success() {
        let envelope = json!({
            "outputs": [{
                "classification_predictions": {
                    "top": "tulsi",
                    "confidence": 0.81,
                    "predictions": [{"class": "tulsi", "confidence": 0.81}]
                }
            }]
        });
        let (url, requests) = serve_once("200 OK", &envelope.to_string());

        let result = classifier(&url)
            .classify(&EncodedImage::new("data:image/png;base64,AQID"))
            .unwrap();

        assert_eq!(result.prediction.top, "tulsi");
        let sent: serde_json::Value = serde_json::from_str(&requests.recv().unwrap()).unwrap();
        assert_eq!(sent["api_key"], "secret");
        assert_eq!(sent["inputs"]["image"]["value"], "AQID");
    }

    #[test]
    fn test_classify_non_success_status() {
        let (url, _requests) = serve_once("401 Unauthorized", "{\"message\":\"bad key\"}");

        let error = classifier(&url)
            .classify(&EncodedImage::new("data:image/png;base64,AQID"))
            .unwrap_err();

        assert_eq!(error, ClassifyError::Api { status: 401 });
    }

    #[test]
    fn test_classify_unrecognized_body() {
        let (url, _requests) = serve_once("200 OK", "{\"outputs\":[{}]}");

        let error = classifier(&url)
            .classify(&EncodedImage::new("data:image/png;base64,AQID"))
            .unwrap_err();

        assert!(matches!(error, ClassifyError::InvalidResponseFormat(_)));
    }

    #[test]
    fn test_classify_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/infer", listener.local_addr().unwrap());
        drop(listener);

        let error = classifier(&url)
            .classify(&EncodedImage::new("data:image/png;base64,AQID"))
            .unwrap_err();

        assert!(matches!(error, ClassifyError::Transport(_)));
    }
}
