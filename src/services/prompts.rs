// src/services/prompts.rs
//! Fixed instructions sent to the inference gateway.

use crate::message::{BodyMeasurements, BodyType, Size};

pub const BODY_SYSTEM_PROMPT: &str = r#"You are an expert body measurement analyst for fashion. Analyze the person in the image and provide accurate body measurements and body type classification. Be professional and precise.

Return ONLY valid JSON with this exact structure, using plain numbers (no units) for every measurement:
{
  "bodyType": "hourglass" | "pear" | "apple" | "rectangle" | "inverted-triangle",
  "measurements": {
    "chest": number (inches),
    "waist": number (inches),
    "hips": number (inches),
    "shoulders": number (inches),
    "height": number (centimetres, estimated)
  },
  "recommendedSize": "XS" | "S" | "M" | "L" | "XL" | "XXL",
  "fitAdvice": "personalized fit recommendations"
}"#;

pub const BODY_USER_PROMPT: &str =
    "Please analyze this person's body measurements and type for clothing recommendations.";

pub const SKIN_SYSTEM_PROMPT: &str = r#"You are an expert color analyst and fashion consultant. Analyze the person's skin tone in the image and provide detailed color recommendations. Be professional and culturally sensitive.

Return ONLY valid JSON with this exact structure:
{
  "skinTone": "fair" | "light" | "medium" | "olive" | "tan" | "deep" | "dark",
  "undertone": "warm" | "cool" | "neutral",
  "seasonalPalette": "spring" | "summer" | "autumn" | "winter",
  "bestColors": [five color names],
  "avoidColors": [three color names],
  "metalRecommendation": "gold" | "silver" | "rose-gold",
  "styleAdvice": "personalized color and style tips"
}"#;

pub const SKIN_USER_PROMPT: &str =
    "Please analyze this person's skin tone and provide color recommendations for fashion.";

pub const CHAT_SYSTEM_PROMPT: &str = "You are a friendly personal fashion assistant for an online clothing store. Help with outfit suggestions, styling advice, color matching and wardrobe planning. Keep answers concise and practical, and suggest the virtual try-on or skin-tone analysis features when they would help.";

pub const DEFAULT_CLOTHING_NAME: &str = "clothing item";

/// Composite instruction for the try-on model. Images follow as parts: the
/// person first, then the garment.
pub fn tryon_prompt(clothing_name: &str, body: Option<&BodyMeasurements>) -> String {
    let mut prompt = format!(
        "Create a photorealistic virtual try-on image. Take the person from the first image and dress them in the clothing item ({clothing_name}) from the second image. \
The garment must fit naturally on their body, follow their body contours and layer correctly over or under their existing clothes, as if they were actually wearing it. \
Maintain realistic shadows, folds and draping. Keep the person's face, pose and background unchanged."
    );

    if let Some(body) = body {
        let m = &body.measurements;
        prompt.push_str(&format!(
            " Fit details: the person has a {} body type with chest {} in, waist {} in, hips {} in and shoulders {} in, and wears size {}. Tailor the fit and drape to these proportions.",
            body_type_label(body.body_type),
            m.chest,
            m.waist,
            m.hips,
            m.shoulders,
            size_label(body.recommended_size),
        ));
    }

    prompt
}

fn body_type_label(body_type: BodyType) -> &'static str {
    match body_type {
        BodyType::Hourglass => "hourglass",
        BodyType::Pear => "pear",
        BodyType::Apple => "apple",
        BodyType::Rectangle => "rectangle",
        BodyType::InvertedTriangle => "inverted-triangle",
    }
}

fn size_label(size: Size) -> &'static str {
    match size {
        Size::XS => "XS",
        Size::S => "S",
        Size::M => "M",
        Size::L => "L",
        Size::XL => "XL",
        Size::XXL => "XXL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Measurements;

    fn body() -> BodyMeasurements {
        BodyMeasurements {
            body_type: BodyType::Pear,
            measurements: Measurements {
                chest: 34.0,
                waist: 28.0,
                hips: 38.5,
                shoulders: 15.0,
                height: 165.0,
            },
            recommended_size: Size::M,
            fit_advice: "ok".into(),
        }
    }

    #[test]
    fn prompt_names_the_garment() {
        let prompt = tryon_prompt("Linen Blazer", None);
        assert!(prompt.contains("(Linen Blazer)"));
        assert!(!prompt.contains("Fit details"));
    }

    #[test]
    fn prompt_appends_fit_details_when_measured() {
        let prompt = tryon_prompt("Linen Blazer", Some(&body()));
        assert!(prompt.contains("pear body type"));
        assert!(prompt.contains("chest 34 in"));
        assert!(prompt.contains("hips 38.5 in"));
        assert!(prompt.contains("size M"));
        assert!(!prompt.contains("165"));
    }
}
