// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body for the body- and skin-analysis endpoints.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    #[serde(default)]
    pub user_image: Option<String>,
    #[serde(default)]
    pub clothing_image: Option<String>,
    #[serde(default)]
    pub clothing_name: Option<String>,
    /// Whatever the body-analysis endpoint returned; read leniently.
    #[serde(default)]
    pub body_measurements: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnResponse {
    pub tryon_image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    Hourglass,
    Pear,
    Apple,
    Rectangle,
    InvertedTriangle,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
}

/// Chest, waist, hips and shoulders in inches; height in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
    pub shoulders: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurements {
    pub body_type: BodyType,
    pub measurements: Measurements,
    pub recommended_size: Size,
    pub fit_advice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAnalysis {
    pub skin_tone: String,
    pub undertone: Undertone,
    pub seasonal_palette: String,
    pub best_colors: Vec<String>,
    pub avoid_colors: Vec<String>,
    pub metal_recommendation: String,
    pub style_advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_measurements_use_wire_names() {
        let parsed: BodyMeasurements = serde_json::from_value(json!({
            "bodyType": "inverted-triangle",
            "measurements": {"chest": 40, "waist": 32, "hips": 36, "shoulders": 18.5, "height": 180},
            "recommendedSize": "XL",
            "fitAdvice": "structured shoulders"
        }))
        .unwrap();
        assert_eq!(parsed.body_type, BodyType::InvertedTriangle);
        assert_eq!(parsed.recommended_size, Size::XL);
        assert_eq!(parsed.measurements.shoulders, 18.5);
    }

    #[test]
    fn skin_analysis_rejects_unknown_undertone() {
        let result = serde_json::from_value::<SkinAnalysis>(json!({
            "skinTone": "olive",
            "undertone": "purple",
            "seasonalPalette": "autumn",
            "bestColors": [],
            "avoidColors": [],
            "metalRecommendation": "gold",
            "styleAdvice": ""
        }));
        assert!(result.is_err());
    }

    #[test]
    fn tryon_request_fields_are_optional() {
        let req: TryOnRequest = serde_json::from_value(json!({"userImage": "data:image/png;base64,A"})).unwrap();
        assert!(req.user_image.is_some());
        assert!(req.clothing_image.is_none());
        assert!(req.body_measurements.is_none());
    }
}
