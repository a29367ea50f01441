fn main() {
    println!("cargo:rerun-if-env-changed=HAZARD_NODE_CONFIG");
    println!("cargo:rerun-if-env-changed=HAZARD_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=HAZARD_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=HAZARD_AP_SSID");
    println!("cargo:rerun-if-env-changed=HAZARD_AP_PASS");

    // Host test builds run without the ESP-IDF toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
