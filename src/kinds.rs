//! `ragwire kinds`: list the registered contract kinds.

use ragwire_core::ContractKind;

/// Print one row per kind: name, family, whether it ranks, description.
pub fn list_kinds() {
    println!("{:<24} {:<9} {:<6} DESCRIPTION", "KIND", "FAMILY", "RANK");
    for kind in ContractKind::ALL {
        let info = kind.info();
        println!(
            "{:<24} {:<9} {:<6} {}",
            info.name,
            info.family,
            if info.rankable { "yes" } else { "no" },
            info.description
        );
    }
}
