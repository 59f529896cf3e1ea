fn main() {
    // ESP-IDF build-environment propagation is only meaningful for device
    // builds; host test builds skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
