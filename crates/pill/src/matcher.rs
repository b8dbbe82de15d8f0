//! Free-text matching of registry shape/color/imprint fields
//!
//! The registry describes appearance in Korean free text ("타원형",
//! "연한노랑", ...). Queries use canonical English tags which map to the
//! acceptable substrings below.

/// Canonical pill shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillShape {
    Round,
    Oval,
    Capsule,
    Rectangle,
    Diamond,
    Hexagon,
    Octagon,
    Triangle,
}

impl PillShape {
    /// Parse a canonical tag (case-insensitive)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "round" => Some(Self::Round),
            "oval" => Some(Self::Oval),
            "capsule" => Some(Self::Capsule),
            "rectangle" => Some(Self::Rectangle),
            "diamond" => Some(Self::Diamond),
            "hexagon" => Some(Self::Hexagon),
            "octagon" => Some(Self::Octagon),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }

    /// Registry substrings accepted for this shape
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::Round => &["원형", "원", "정"],
            Self::Oval => &["타원형", "타원", "장타원"],
            Self::Capsule => &["캡슐", "캡슐형", "경질캡슐", "연질캡슐"],
            Self::Rectangle => &["사각형", "장방형", "방형", "장형", "직사각"],
            Self::Diamond => &["다이아몬드", "마름모", "菱形"],
            Self::Hexagon => &["육각형", "6각"],
            Self::Octagon => &["팔각형", "8각"],
            Self::Triangle => &["삼각형", "3각"],
        }
    }

    /// Registry substrings that rule the shape out even when a synonym hits
    ///
    /// "원" is contained in "타원형", so round must exclude oval.
    pub fn exclusions(&self) -> &'static [&'static str] {
        match self {
            Self::Round => &["타원"],
            Self::Rectangle => &["삼각", "육각", "팔각"],
            Self::Hexagon => &["팔각"],
            Self::Octagon => &["육각"],
            _ => &[],
        }
    }
}

/// Canonical pill color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillColor {
    White,
    Yellow,
    Orange,
    Red,
    Pink,
    Blue,
    Green,
    Brown,
    Gray,
}

impl PillColor {
    /// Parse a canonical tag (case-insensitive)
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "white" => Some(Self::White),
            "yellow" => Some(Self::Yellow),
            "orange" => Some(Self::Orange),
            "red" => Some(Self::Red),
            "pink" => Some(Self::Pink),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "brown" => Some(Self::Brown),
            "gray" | "grey" => Some(Self::Gray),
            _ => None,
        }
    }

    /// Registry substrings accepted for this color
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Self::White => &["흰색", "백색", "흰", "white", "하양", "백"],
            Self::Yellow => &["노란색", "황색", "노랑", "황", "yellow", "연한노랑", "진한노랑"],
            Self::Orange => &["주황색", "등색", "주황", "orange", "등", "오렌지"],
            Self::Red => &["빨간색", "적색", "빨강", "적", "red", "홍", "연한빨강", "진한빨강"],
            Self::Pink => &["분홍색", "홍색", "분홍", "pink", "연분홍", "진분홍"],
            Self::Blue => &["파란색", "청색", "파랑", "청", "blue", "연한파랑", "진한파랑"],
            Self::Green => &["초록색", "녹색", "초록", "녹", "green", "연한초록", "진한초록"],
            Self::Brown => &["갈색", "brown", "갈", "연갈", "진갈"],
            Self::Gray => &["회색", "회", "gray", "그레이", "연한회색", "진한회색"],
        }
    }
}

/// Drop whitespace and lowercase
fn normalize_label(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(normalize_label(needle).as_str()))
}

/// Shape filter; an empty or unknown tag lets everything through
pub fn matches_shape(registry_shape: &str, tag: &str) -> bool {
    let Some(shape) = PillShape::parse(tag) else {
        return true;
    };

    let value = normalize_label(registry_shape);
    if contains_any(&value, shape.exclusions()) {
        return false;
    }
    contains_any(&value, shape.synonyms())
}

/// Color filter; an empty or unknown tag lets everything through
pub fn matches_color(registry_color: &str, tag: &str) -> bool {
    let Some(color) = PillColor::parse(tag) else {
        return true;
    };

    contains_any(&normalize_label(registry_color), color.synonyms())
}

/// Uppercase and drop whitespace, `-`, `.` and `_`
pub fn normalize_imprint(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '_'))
        .collect::<String>()
        .to_uppercase()
}

/// Imprint filter against the front and back markings
///
/// The query matches when its raw uppercased form or its normalized form is
/// contained in either side, compared the same way.
pub fn matches_imprint(front: &str, back: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let raw = query.to_uppercase();
    let normalized = normalize_imprint(query);

    [front, back].iter().any(|side| {
        side.to_uppercase().contains(&raw) || normalize_imprint(side).contains(&normalized)
    })
}
