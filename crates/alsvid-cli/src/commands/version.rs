//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum error-correction circuit compilation",
        style("Alsvid").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  alsvid-code     Tanner-graph code model and constructors");
    println!("  alsvid-compile  Schedule solving and flag planning");
    println!("  alsvid-qes      QES circuit emission");
    println!("  alsvid-cli      Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/alsvid").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
