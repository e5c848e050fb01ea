fn main() {
    app::main()
}
