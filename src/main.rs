fn main() {
    std::process::exit(disclosure_gate_lib::run(std::env::args()));
}
