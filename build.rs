use std::collections::HashSet;
use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/fungi.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let species = catalog.get("species").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'species' field\n\
             The catalog must have a top-level 'species' array.\n"
        );
    });

    let species = species.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'species' must be an array\n\
             Got: {species}\n"
        );
    });

    let ids = validate_species(species);
    let mapping_count = validate_its_mappings(catalog, &ids);

    println!(
        "cargo:warning=Validated catalog: {} species, {mapping_count} ITS mappings",
        species.len()
    );
}

fn validate_species(species: &[serde_json::Value]) -> HashSet<u64> {
    let mut ids = HashSet::new();

    for (i, entry) in species.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| {
                panic!("\n\nCATALOG BUILD ERROR: Species at index {i} missing numeric 'id' field\n")
            });

        assert!(
            ids.insert(id),
            "\n\nCATALOG BUILD ERROR: Duplicate species id {id} (index {i})\n"
        );

        let name = entry
            .get("scientific_name")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        assert!(
            !name.trim().is_empty(),
            "\n\nCATALOG BUILD ERROR: Species {id} (index {i}) missing 'scientific_name'\n"
        );

        let common_names = entry
            .get("common_names")
            .and_then(|v| v.as_array())
            .map_or(0, Vec::len);
        assert!(
            common_names > 0,
            "\n\nCATALOG BUILD ERROR: Species '{name}' ({id}) needs at least one common name\n"
        );
    }

    ids
}

fn validate_its_mappings(catalog: &serde_json::Value, ids: &HashSet<u64>) -> usize {
    let Some(mappings) = catalog.get("its_mappings").and_then(|m| m.as_object()) else {
        return 0;
    };

    for (sequence, id) in mappings {
        let id = id.as_u64().unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: ITS mapping '{sequence}' must map to a numeric id\n")
        });
        // The embedded catalog must be self-consistent; custom catalogs are checked at runtime
        assert!(
            ids.contains(&id),
            "\n\nCATALOG BUILD ERROR: ITS mapping '{sequence}' points to unknown species {id}\n"
        );
        assert!(
            sequence == &sequence.trim().to_uppercase(),
            "\n\nCATALOG BUILD ERROR: ITS key '{sequence}' must be trimmed uppercase\n"
        );
    }

    mappings.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/fungi.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
