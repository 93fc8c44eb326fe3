use ratatui::style::Color;

/// Fixed category palette. Cards, pie slices, and legend swatches all map a
/// category through the same function so one render pass stays consistent.
pub const PALETTE: [Color; 10] = [
    Color::Rgb(255, 99, 132),
    Color::Rgb(54, 162, 235),
    Color::Rgb(153, 102, 255),
    Color::Rgb(255, 159, 64),
    Color::Rgb(75, 192, 192),
    Color::Rgb(255, 205, 86),
    Color::Rgb(123, 104, 238),
    Color::Rgb(46, 204, 113),
    Color::Rgb(155, 89, 182),
    Color::Rgb(231, 76, 60),
];

/// Numeric categories pick their slot by value modulo the palette size;
/// non-numeric ones fall back to their position modulo the palette size.
pub fn category_color(value: &str, position: usize) -> Color {
    let index = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map_or(position % PALETTE.len(), |number| {
            (number as i64).rem_euclid(PALETTE.len() as i64) as usize
        });
    PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_categories_map_by_value_mod_palette_size() {
        assert_eq!(category_color("3", 0), PALETTE[3]);
        assert_eq!(category_color("13", 0), PALETTE[3]);
        assert_eq!(category_color("10", 7), PALETTE[0]);
    }

    #[test]
    fn non_numeric_categories_fall_back_to_position() {
        assert_eq!(category_color("fruit", 2), PALETTE[2]);
        assert_eq!(category_color("fruit", 12), PALETTE[2]);
    }

    #[test]
    fn same_category_always_gets_the_same_color() {
        assert_eq!(category_color("7", 0), category_color("7", 9));
    }
}
