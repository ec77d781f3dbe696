/// Render a cost in its shortest exact form: `2`, `2.5`, `0.0004`.
pub fn format_cost(cost: f64) -> String {
    if cost == 0.0 {
        return "0".to_string();
    }
    format!("{}", cost)
}

/// Render a node path as `A > B > C`.
pub fn format_path(path: &[&str]) -> String {
    path.join(" > ")
}
