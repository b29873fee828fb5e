#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreCell {
    Value(f64),
    Missing,
    Invalid,
}

const MISSING_TOKENS: &[&str] = &["", "NaN", "nan", "NA", "N/A", "null"];

pub fn parse_score(raw: &str) -> ScoreCell {
    let trimmed = raw.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return ScoreCell::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => ScoreCell::Value(v),
        _ => ScoreCell::Invalid,
    }
}
