use console::Style;
use ndarray::{Array1, Array2};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
        }
    }
}

/// Print the covariance matrix, one band per line.
pub fn print_covariance(covariance: &Array2<f64>) {
    let s = Styles::new();

    println!("  {}", s.title.apply_to("Covariance matrix"));
    for row in covariance.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>14.6}")).collect();
        println!("    {}", s.value.apply_to(cells.join(" ")));
    }
    println!();
}

/// Print the explained-variance ratios, one component per line.
pub fn print_variance_ratio(ratio: &Array1<f64>) {
    let s = Styles::new();

    println!("  {}", s.title.apply_to("Explained variance ratio"));
    for (component, value) in ratio.iter().enumerate() {
        println!(
            "    {:<6}{}",
            s.label.apply_to(format!("PC{}", component + 1)),
            s.value
                .apply_to(format!("{value:.6} ({:.2}%)", value * 100.0))
        );
    }
    println!();
}
