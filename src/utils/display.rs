use crate::transcript::Transcript;
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_transcript_summary(transcript: &Transcript) {
    print_info(&format!(
        "{} messages, {} users, {} channels, {} roles resolved",
        transcript.messages.len(),
        transcript.entities.users.len(),
        transcript.entities.channels.len(),
        transcript.entities.roles.len()
    ));
}
