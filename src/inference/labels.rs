use serde::Serialize;

/// Number of output units of the classifier.
pub const NUM_CLASSES: usize = 9;

/// Pest species, in the order of the network's output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PestClass {
    Aphids,
    Armyworm,
    Beetle,
    Bollworm,
    Grasshopper,
    Mites,
    Mosquito,
    Sawfly,
    StemBorer,
}

impl PestClass {
    pub const ALL: [PestClass; NUM_CLASSES] = [
        PestClass::Aphids,
        PestClass::Armyworm,
        PestClass::Beetle,
        PestClass::Bollworm,
        PestClass::Grasshopper,
        PestClass::Mites,
        PestClass::Mosquito,
        PestClass::Sawfly,
        PestClass::StemBorer,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label as the model was trained with it.
    pub fn name(self) -> &'static str {
        match self {
            PestClass::Aphids => "aphids",
            PestClass::Armyworm => "armyworm",
            PestClass::Beetle => "beetle",
            PestClass::Bollworm => "bollworm",
            PestClass::Grasshopper => "grasshopper",
            PestClass::Mites => "mites",
            PestClass::Mosquito => "mosquito",
            PestClass::Sawfly => "sawfly",
            PestClass::StemBorer => "stem_borer",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PestClass::Aphids => "Aphids",
            PestClass::Armyworm => "Armyworm",
            PestClass::Beetle => "Beetle",
            PestClass::Bollworm => "Bollworm",
            PestClass::Grasshopper => "Grasshopper",
            PestClass::Mites => "Mites",
            PestClass::Mosquito => "Mosquito",
            PestClass::Sawfly => "Sawfly",
            PestClass::StemBorer => "Stem borer",
        }
    }

    pub fn remedies(self) -> &'static [&'static str] {
        match self {
            PestClass::Aphids => &[
                "Spray neem oil",
                "Use insecticidal soap",
                "Remove infected leaves",
            ],
            PestClass::Armyworm => &[
                "Apply Bt spray",
                "Use recommended insecticide",
                "Monitor crops",
            ],
            PestClass::Beetle => &["Handpick beetles", "Apply neem oil", "Use light traps"],
            PestClass::Bollworm => &[
                "Use pheromone traps",
                "Apply Bt spray",
                "Remove damaged bolls",
            ],
            PestClass::Grasshopper => &[
                "Use garlic spray",
                "Install net protection",
                "Eco pesticides",
            ],
            PestClass::Mites => &[
                "Spray miticide",
                "Increase humidity",
                "Remove infected leaves",
            ],
            PestClass::Mosquito => &[
                "Remove standing water",
                "Use repellents",
                "Apply larvicides",
            ],
            PestClass::Sawfly => &[
                "Hand remove larvae",
                "Apply neem oil",
                "Use insecticidal soap",
            ],
            PestClass::StemBorer => &[
                "Remove affected stems",
                "Apply systemic insecticide",
                "Use traps",
            ],
        }
    }
}

impl std::fmt::Display for PestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
