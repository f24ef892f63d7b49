//! Text rendering of board grids for terminal display
//!
//! Renders the 8x8 symbol grid produced by the engine adapter with algebraic
//! coordinates (files a-h, ranks 8-1).

/// Renders the board with separators and rank/file labels.
pub fn render(grid: &[Vec<char>]) -> String {
    let separator = format!("  +{}", "---+".repeat(8));
    let mut lines = vec![separator.clone()];

    for (rank_idx, rank) in grid.iter().enumerate() {
        let rank_num = 8 - rank_idx;
        let squares: Vec<String> = rank.iter().map(|piece| format!(" {} ", piece)).collect();
        lines.push(format!("{} |{}|", rank_num, squares.join("|")));
        lines.push(separator.clone());
    }

    let files: Vec<String> = "abcdefgh".chars().map(|f| f.to_string()).collect();
    lines.push(format!("    {}", files.join("   ")));

    lines.join("\n")
}

/// Renders the board in a more compact format without separators.
pub fn render_compact(grid: &[Vec<char>]) -> String {
    let mut lines = Vec::new();

    for (rank_idx, rank) in grid.iter().enumerate() {
        let rank_num = 8 - rank_idx;
        let squares: Vec<String> = rank.iter().map(|piece| format!(" {} ", piece)).collect();
        lines.push(format!("{} {}", rank_num, squares.join(" ")));
    }
    lines.push("   a   b   c   d   e   f   g   h".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;

    #[test]
    fn test_render_initial_board() {
        let rendered = render(&Position::initial().grid());
        let lines: Vec<&str> = rendered.lines().collect();

        // 8 ranks with a separator above each, one closing separator, one label row.
        assert_eq!(lines.len(), 18);
        assert!(lines[0].starts_with("  +---+"));
        assert!(lines[1].starts_with("8 | r | n | b | q | k | b | n | r |"));
        assert!(lines[15].starts_with("1 | R | N | B | Q | K | B | N | R |"));
        assert_eq!(lines[17], "    a   b   c   d   e   f   g   h");
    }

    #[test]
    fn test_render_compact_initial_board() {
        let rendered = render_compact(&Position::initial().grid());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("8  r "));
        assert!(lines[8].starts_with("   a"));
    }
}
