//! Command line runner for the `gyrodrift` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    #[cfg(feature = "cli")]
    gyrodrift::cli::run::run();
}

#[cfg(feature = "for-testing")]
fn main() {
    #[cfg(feature = "cli")]
    {
        eprintln!(
            "Warning: The `for-testing` feature is enabled, which will turn errors into panics\n\
             Tip: Build without `--features=for-testing` for regular error messages"
        );
        gyrodrift::cli::run::run();
    }
}
