// Noun lemmatizer.
//
// Irregular plurals come from a fixed exception table; everything else goes
// through WordNet-style detachment rules (`ies`, `ses`, `xes`, `zes`, `ches`,
// `shes`, `men`, `s`). There is no dictionary to confirm a candidate, so the
// rules are guarded by small tables of singulars they would otherwise mangle.
// Detachment repeats until the word stops changing, which makes every lemma a
// fixed point: "datas" -> "data" -> "datum".

/// Irregular noun plurals and their singular form.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("bacteria", "bacterium"),
    ("children", "child"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("data", "datum"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("hypotheses", "hypothesis"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("matrices", "matrix"),
    ("media", "medium"),
    ("men", "man"),
    ("mice", "mouse"),
    ("phenomena", "phenomenon"),
    ("quizzes", "quiz"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("vertices", "vertex"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

/// Words that look plural but are already singular.
const INVARIANT: &[&str] = &[
    "chaos", "cosmos", "ethos", "kudos", "mathematics", "news", "pancreas", "pathos",
    "physics", "series", "species", "thermos",
];

/// Singulars ending in `s` that pluralize with `es` ("bus" -> "buses").
const ES_SINGULARS: &[&str] = &[
    "alias", "apparatus", "atlas", "bias", "bonus", "bus", "campus", "canvas", "census",
    "chorus", "circus", "consensus", "fetus", "focus", "gas", "iris", "lens", "octopus",
    "plus", "prospectus", "sinus", "status", "surplus", "virus", "walrus",
];

/// Singulars ending in `e` whose plural would otherwise hit the `ies` or
/// `ches` rule ("movies" is not "movy").
const E_SINGULARS: &[&str] = &[
    "ache", "avalanche", "brownie", "cache", "calorie", "cliche", "cookie", "genie",
    "goalie", "headache", "hoodie", "moustache", "movie", "niche", "prairie", "psyche",
    "rookie", "selfie", "smoothie", "sortie", "zombie",
];

/// Singulars ending in `men` that are not compounds of "man".
const MEN_SINGULARS: &[&str] = &[
    "abdomen", "acumen", "albumen", "amen", "bitumen", "hymen", "lumen", "omen", "regimen",
    "semen", "specimen", "stamen",
];

/// Reduce a lowercase token to its noun lemma.
pub fn lemmatize(token: &str) -> String {
    let mut lemma = token.to_string();
    loop {
        let next = detach(&lemma);
        if next == lemma {
            return lemma;
        }
        lemma = next;
    }
}

/// One detachment step. Returns the input unchanged when no rule applies.
fn detach(token: &str) -> String {
    if let Some((_, lemma)) = EXCEPTIONS.iter().find(|(plural, _)| *plural == token) {
        return (*lemma).to_string();
    }
    if INVARIANT.contains(&token)
        || ES_SINGULARS.contains(&token)
        || MEN_SINGULARS.contains(&token)
    {
        return token.to_string();
    }

    let len = token.len();

    if let Some(stem) = token.strip_suffix("es") {
        if ES_SINGULARS.contains(&stem) {
            return stem.to_string();
        }
    }
    if let Some(stem) = token.strip_suffix('s') {
        if E_SINGULARS.contains(&stem) {
            return stem.to_string();
        }
    }

    if len > 4 && token.ends_with("ies") {
        return format!("{}y", &token[..len - 3]);
    }

    if len > 4 {
        for suffix in ["sses", "xes", "zzes", "tzes", "ches", "shes"] {
            if token.ends_with(suffix) {
                return token[..len - 2].to_string();
            }
        }
    }

    if len > 3 && token.ends_with("men") {
        return format!("{}man", &token[..len - 3]);
    }

    if len > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..len - 1].to_string();
    }

    token.to_string()
}
