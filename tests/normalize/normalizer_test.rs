use barrio_facts::LabelNormalizer;

#[test]
fn strips_list_indices_and_footnotes() {
    let normalizer = LabelNormalizer::new();
    assert_eq!(normalizer.normalize("1. el Raval"), "elraval");
    assert_eq!(normalizer.normalize("03, el Fort Pienc"), "elfortpienc");
    assert_eq!(normalizer.normalize("la Barceloneta (1)"), "labarceloneta");
    assert_eq!(normalizer.normalize("la Barceloneta (1) (2)"), "labarceloneta");
}

#[test]
fn strips_statistical_zone_suffix() {
    let normalizer = LabelNormalizer::new();
    assert_eq!(
        normalizer.normalize("la Marina del Prat Vermell - AEI Zona Franca"),
        "lamarinadelpratvermell"
    );
    assert_eq!(
        normalizer.normalize("el Poble Sec - aei Parc Montjuïc"),
        "elpoblesec"
    );
    // A plain hyphenated name is not a zone suffix
    assert_eq!(normalizer.normalize("Sants - Badal"), "santsbadal");
}

#[test]
fn folds_case_accents_and_punctuation() {
    let normalizer = LabelNormalizer::new();
    assert_eq!(
        normalizer.normalize("Sant Martí de Provençals"),
        "santmartideprovencals"
    );
    assert_eq!(
        normalizer.normalize("la Dreta de l'Eixample"),
        "ladretadeleixample"
    );
    assert_eq!(
        normalizer.normalize("SANT PERE, SANTA CATERINA I LA RIBERA"),
        "santperesantacaterinailaribera"
    );
}

#[test]
fn substitutes_known_aliases() {
    let normalizer = LabelNormalizer::new();
    // Sources that elide the article land on the canonical form
    assert_eq!(normalizer.normalize("Raval"), "elraval");
    assert_eq!(normalizer.normalize("Barceloneta"), "labarceloneta");
    assert_eq!(normalizer.normalize("2. Barri Gòtic"), "elbarrigotic");
}

#[test]
fn is_total_on_degenerate_input() {
    let normalizer = LabelNormalizer::new();
    assert_eq!(normalizer.normalize(""), "");
    assert_eq!(normalizer.normalize("   \t "), "");
    assert_eq!(normalizer.normalize("(3)"), "");
    assert_eq!(normalizer.normalize("··· --- ···"), "");
}

#[test]
fn normalize_is_idempotent() {
    let normalizer = LabelNormalizer::new();
    let inputs = [
        "1. el Raval",
        "03, Sants - Badal",
        "la Marina del Prat Vermell - AEI Zona Franca",
        "Sant Martí de Provençals (1)",
        "  Barceloneta  ",
        "la Dreta de l'Eixample",
        "Unknown Zone 42",
        "",
        "  12, 34 ",
    ];
    for input in inputs {
        let once = normalizer.normalize(input);
        assert_eq!(
            normalizer.normalize(&once),
            once,
            "normalize is not idempotent for {input:?}"
        );
    }
}
