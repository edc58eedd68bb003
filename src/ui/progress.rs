use indicatif::{ProgressBar, ProgressStyle};

pub fn create_step_progress(num_steps: u8) -> ProgressBar {
    let pb = ProgressBar::new(u64::from(num_steps));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:32.cyan}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("⣀⣤⣦⣶⣷⣿ "),
    );
    pb.set_prefix("Step");
    pb
}

pub fn create_transport_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix("Transport");
    pb
}
