fn main() {
    // Emits the ESP-IDF linker/env plumbing when building for espidf;
    // a no-op for host-target builds (cargo test on x86_64).
    embuild::espidf::sysenv::output();
}
