use colored::*;

// diagnostics go to stderr, stdout only carries the report.

#[allow(unused_variables)]
pub fn debug(msg: &str) {
    #[cfg(feature = "debug")]
    eprintln!("{}", format!("[debug]:{}", msg).yellow());
}

#[allow(unused_variables)]
pub fn log(msg: &str) {
    #[cfg(feature = "log")]
    eprintln!("{}", format!("[log]:{}", msg).green());
}

pub fn error(msg: &str) {
    eprintln!("{}", format!("[error]:{}", msg).red());
}
