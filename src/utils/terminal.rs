//! Terminal output utilities

use console::style;

use crate::build::cmake::ComposedCommand;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}: {}", style("success").green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}: {}", style("info").blue().bold(), message);
}

/// Print a command before it runs, one argument per line
pub fn print_command(title: &str, command: &ComposedCommand) {
    println!(
        "{} {} {}",
        style(">>").cyan().bold(),
        title,
        style(command.program().display()).bold()
    );
    for arg in command.args() {
        println!("\t{}", arg.to_string_lossy());
    }
    println!();
}

/// Print a section header
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}", "=".repeat(60));
}
