use serde::Serialize;
use serde_json::Value;

/// Source field aliases, in precedence order (first non-empty wins)
///
/// The registry has answered with UPPER_SNAKE keys, lower_snake keys and
/// camelCase keys over time; older payloads used MARK_CODE_* for imprints
/// and MATERIAL_NAME for the ingredient.
mod fields {
    pub const NAME: &[&str] = &["ITEM_NAME", "item_name", "itemName"];
    pub const INGREDIENT: &[&str] = &["CLASS_NAME", "class_name", "MATERIAL_NAME", "material_name"];
    pub const SHAPE: &[&str] = &["DRUG_SHAPE", "drug_shape", "drugShape"];
    pub const COLOR_1: &[&str] = &["COLOR_CLASS1", "color_class1"];
    pub const COLOR_2: &[&str] = &["COLOR_CLASS2", "color_class2"];
    pub const COLOR: &[&str] = &["COLOR_CLASS", "color_class"];
    pub const PRINT_FRONT: &[&str] =
        &["PRINT_FRONT", "print_front", "printFront", "MARK_CODE_FRONT", "mark_code_front"];
    pub const PRINT_BACK: &[&str] =
        &["PRINT_BACK", "print_back", "printBack", "MARK_CODE_BACK", "mark_code_back"];
    pub const OTC_CLASS: &[&str] = &["ETC_OTC_NAME", "etc_otc_name", "etcOtcName"];
    pub const IMAGE: &[&str] = &["ITEM_IMAGE", "item_image", "itemImage"];
    pub const MANUFACTURER: &[&str] = &["ENTP_NAME", "entp_name"];
    pub const PERMIT_DATE: &[&str] = &["ITEM_PERMIT_DATE", "item_permit_date"];
    pub const LENG_LONG: &[&str] = &["LENG_LONG", "leng_long"];
    pub const LENG_SHORT: &[&str] = &["LENG_SHORT", "leng_short"];
    pub const THICK: &[&str] = &["THICK", "thick"];
    pub const FORM_CODE_NAME: &[&str] = &["FORM_CODE_NAME", "form_code_name"];
    pub const ITEM_SEQ: &[&str] = &["ITEM_SEQ", "item_seq"];
}

/// Normalized registry entry returned to API clients
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PillCandidate {
    pub name: String,
    pub ingredient: String,
    #[serde(rename = "shape_kr")]
    pub shape: String,
    #[serde(rename = "color_kr")]
    pub color: String,
    /// Front and back markings joined with " / "
    pub imprint: String,
    #[serde(skip)]
    pub print_front: String,
    #[serde(skip)]
    pub print_back: String,
    /// 전문/일반 의약품 구분
    #[serde(rename = "type")]
    pub otc_class: String,
    pub image: String,
    pub entp_name: String,
    pub item_permit_date: String,
    pub leng_long: String,
    pub leng_short: String,
    pub thick: String,
    pub form_code_name: String,
    pub item_seq: String,
}

/// Scalar JSON value as text; null, empty strings and containers yield None
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pick(item: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().filter_map(|key| item.get(*key)).find_map(scalar_text)
}

fn pick_or(item: &Value, aliases: &[&str], default: &str) -> String {
    pick(item, aliases).unwrap_or_else(|| default.to_string())
}

impl PillCandidate {
    /// Normalize one registry item object
    pub fn from_registry_item(item: &Value) -> Self {
        let print_front = pick_or(item, fields::PRINT_FRONT, "");
        let print_back = pick_or(item, fields::PRINT_BACK, "");

        let two_tone: Vec<String> = [fields::COLOR_1, fields::COLOR_2]
            .iter()
            .filter_map(|aliases| pick(item, aliases))
            .collect();
        let color = if two_tone.is_empty() {
            pick_or(item, fields::COLOR, "")
        } else {
            two_tone.join(" ")
        };

        let image = pick(item, fields::IMAGE)
            .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
            .unwrap_or_default();

        let imprint = [print_front.as_str(), print_back.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" / ");

        Self {
            name: pick_or(item, fields::NAME, "-"),
            ingredient: pick_or(item, fields::INGREDIENT, "-"),
            shape: pick_or(item, fields::SHAPE, ""),
            color,
            imprint,
            print_front,
            print_back,
            otc_class: pick_or(item, fields::OTC_CLASS, ""),
            image,
            entp_name: pick_or(item, fields::MANUFACTURER, ""),
            item_permit_date: pick_or(item, fields::PERMIT_DATE, ""),
            leng_long: pick_or(item, fields::LENG_LONG, ""),
            leng_short: pick_or(item, fields::LENG_SHORT, ""),
            thick: pick_or(item, fields::THICK, ""),
            form_code_name: pick_or(item, fields::FORM_CODE_NAME, ""),
            item_seq: pick_or(item, fields::ITEM_SEQ, ""),
        }
    }
}
