fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match appswitch_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[appswitch] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = appswitch_core::runtime::run_with_options(options) {
        eprintln!("[appswitch] runtime failed: {error}");
        std::process::exit(1);
    }
}
