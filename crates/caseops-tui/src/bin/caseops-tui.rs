fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = caseops_tui::launch::run_from_args(&args);
    std::process::exit(code);
}
