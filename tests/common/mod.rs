use gyrodrift::cli;
use lazy_static::lazy_static;
use std::ffi::OsString;

#[macro_export]
macro_rules! def_test {
    (
        ARGS[$($arg:expr),*]
        fn $name:ident
    ) => {
        #[test]
        fn $name() {
            common::run([$($arg),*]);
        }
    };
}

pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli::run::run_with_args(COMMAND.clone().get_matches_from(args));
}

lazy_static! {
    static ref COMMAND: clap::Command<'static> = cli::build::build().no_binary_name(true);
}
