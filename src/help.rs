//! Help system for dcaspt2-input
//!
//! This module documents the input keywords, the orbital categories and the
//! typical workflow of the program.

use crate::category::Category;
use strum::IntoEnumIterator;

/// Category for organizing keywords in the help system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Keywords describing the molecule.
    Molecule,
    /// Keywords controlling the CASPT2 calculation.
    Caspt2,
    /// Section blocks of the input file.
    Sections,
}

impl KeywordCategory {
    const ALL: [KeywordCategory; 3] = [
        KeywordCategory::Molecule,
        KeywordCategory::Caspt2,
        KeywordCategory::Sections,
    ];

    fn header(self) -> &'static str {
        match self {
            KeywordCategory::Molecule => "MOLECULE",
            KeywordCategory::Caspt2 => "CASPT2 PARAMETERS",
            KeywordCategory::Sections => "SECTIONS",
        }
    }
}

/// Documentation entry for a single input keyword.
#[derive(Debug, Clone)]
pub struct Keyword {
    /// The name of the keyword (e.g., "electron_number", "*ORBITALS").
    pub name: &'static str,
    /// The category to which this keyword belongs.
    pub category: KeywordCategory,
    /// A brief description of what the keyword does.
    pub description: &'static str,
    /// The default value of the keyword, if applicable.
    pub default_value: Option<&'static str>,
    /// An example of how to use the keyword in an input file.
    pub example: Option<&'static str>,
    /// Indicates whether the keyword is required.
    pub required: bool,
}

/// All keyword documentation
pub const KEYWORDS: &[Keyword] = &[
    Keyword {
        name: "electron_number",
        category: KeywordCategory::Molecule,
        description: "Total number of electrons of the molecule. Short form: nelec",
        default_value: None,
        example: Some("electron_number = 10"),
        required: true,
    },
    Keyword {
        name: "point_group",
        category: KeywordCategory::Molecule,
        description: "Abelian point group (C1, Ci, C2, Cs, C2h, D2, C2v, D2h). Needed for the memory estimate",
        default_value: None,
        example: Some("point_group = D2h"),
        required: false,
    },
    Keyword {
        name: "moltra_scheme",
        category: KeywordCategory::Molecule,
        description: "MOLTRA scheme written as .scheme into the CASPT2 input. Short form: scheme",
        default_value: None,
        example: Some("moltra_scheme = 4"),
        required: false,
    },
    Keyword {
        name: "totsym",
        category: KeywordCategory::Caspt2,
        description: "Symmetry number of the target state",
        default_value: Some("1"),
        example: Some("totsym = 33"),
        required: false,
    },
    Keyword {
        name: "selectroot",
        category: KeywordCategory::Caspt2,
        description: "Root of the target symmetry to compute",
        default_value: Some("1"),
        example: Some("selectroot = 2"),
        required: false,
    },
    Keyword {
        name: "diracver",
        category: KeywordCategory::Caspt2,
        description: "DIRAC major version used to produce the integrals",
        default_value: Some("21 (or default_diracver from dcaspt2_config.cfg)"),
        example: Some("diracver = 22"),
        required: false,
    },
    Keyword {
        name: "eshift",
        category: KeywordCategory::Caspt2,
        description: "Real level shift",
        default_value: Some("0.0"),
        example: Some("eshift = 0.1"),
        required: false,
    },
    Keyword {
        name: "pshift",
        category: KeywordCategory::Caspt2,
        description: "Imaginary level shift",
        default_value: Some("0.0"),
        example: Some("pshift = 0.05"),
        required: false,
    },
    Keyword {
        name: "ras1_max_hole",
        category: KeywordCategory::Caspt2,
        description: "Maximum number of holes in RAS1. Must not exceed the number of RAS1 spinors",
        default_value: Some("0"),
        example: Some("ras1_max_hole = 2"),
        required: false,
    },
    Keyword {
        name: "ras3_max_electron",
        category: KeywordCategory::Caspt2,
        description: "Maximum number of electrons in RAS3. Must not exceed the number of RAS3 spinors",
        default_value: Some("0"),
        example: Some("ras3_max_electron = 2"),
        required: false,
    },
    Keyword {
        name: "*ORBITALS",
        category: KeywordCategory::Sections,
        description: "Orbital table, one Kramers pair per row: symmetry index category [energy]",
        default_value: None,
        example: Some("*ORBITALS\nE1g 1 inactive -20.55\nE1u 1 active -0.51\n*"),
        required: true,
    },
    Keyword {
        name: "*CLASSIFY",
        category: KeywordCategory::Sections,
        description: "Reclassifies orbitals by range after the table is read: symmetry category ranges",
        default_value: None,
        example: Some("*CLASSIFY\nE1u ras3 4..6 9\n*"),
        required: false,
    },
];

fn category_description(category: Category) -> &'static str {
    match category {
        Category::Unused => "Dropped from MOLTRA; excluded from every count",
        Category::Inactive => "Doubly occupied core, not correlated in the CASCI step",
        Category::Ras1 => "Occupied active spinors allowed to hold holes (ras1_max_hole)",
        Category::Active => "Fully active space (RAS2)",
        Category::Ras3 => "Virtual active spinors allowed to hold electrons (ras3_max_electron)",
        Category::Secondary => "Virtual spinors, correlated only in the perturbation step",
    }
}

/// Print global help
pub fn print_global_help() {
    println!("dcaspt2-input - DIRAC-CASPT2 input generator");
    println!();
    println!("USAGE:");
    println!("    dcaspt2-input [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    ci <listing_file> [output_file]");
    println!("                        Create an input file from an orbital listing");
    println!("                        Supported formats: .txt, .out, .orb");
    println!();
    println!("    ci dcaspt2_config.cfg");
    println!("                        Create a configuration template file");
    println!();
    println!("    <input_file>");
    println!("                        Summarize the active space and write the IVO and CASPT2 inputs");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help [topic]   Show help. Topics: keywords, categories, examples");
    println!();
    println!("CONFIGURATION FILE:");
    println!("    dcaspt2-input uses 'dcaspt2_config.cfg' for program configuration.");
    println!("    Create template:     dcaspt2-input ci dcaspt2_config.cfg");
    println!("    Supported locations:");
    println!("      - ./dcaspt2_config.cfg (local, highest priority)");
    println!("      - ~/.config/dcaspt2/dcaspt2_config.cfg (user)");
    println!("      - /etc/dcaspt2/dcaspt2_config.cfg (system)");
    println!();
    println!("EXAMPLES:");
    println!("    Create input:        dcaspt2-input ci orbitals.txt");
    println!("    Create with name:    dcaspt2-input ci orbitals.txt h2o.inp");
    println!("    Generate inputs:     dcaspt2-input h2o.inp");
    println!("    View keywords:       dcaspt2-input --help keywords");
    println!("    View categories:     dcaspt2-input --help categories");
    println!();
}

/// Print help for 'ci' command
pub fn print_ci_help() {
    println!("Create Input (ci) Command");
    println!("═════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    dcaspt2-input ci <listing_file> [output_file]");
    println!();
    println!("DESCRIPTION:");
    println!("    Generates an input file from an orbital listing. Orbitals are sorted");
    println!("    by energy; the highest occupied and lowest virtual ones become active,");
    println!("    the remaining occupied ones inactive and the rest secondary.");
    println!();
    println!("ARGUMENTS:");
    println!("    <listing_file>       Orbital listing (required)");
    println!("                        electron_number = N");
    println!("                        point_group = D2h");
    println!("                        <symmetry> <index> <energy>   (one line per orbital)");
    println!();
    println!("    [output_file]        Output input file (optional)");
    println!("                        Default: <listing_stem>.inp");
    println!();
    println!("SETTINGS:");
    println!("    default_active_occupied and default_active_virtual in the [general]");
    println!("    section of dcaspt2_config.cfg control the default active space.");
    println!();
}

/// Print keyword reference
pub fn print_keyword_help() {
    println!("KEYWORD REFERENCE");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();

    for category in KeywordCategory::ALL {
        println!("{}", category.header());
        println!("{}", "─".repeat(76));
        println!();

        for keyword in KEYWORDS.iter().filter(|k| k.category == category) {
            print_keyword(keyword);
            println!();
        }
        println!();
    }
}

/// Print orbital category reference
pub fn print_category_help() {
    println!("ORBITAL CATEGORIES");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    for category in Category::iter() {
        println!("{}", category.summary_label());
        println!("    {}", category_description(category));
        println!();
    }
    println!("Every Kramers pair counts as 2 spinors in the summary.");
    println!("Names are case-insensitive; 'not_used' and 'ras2' are accepted aliases.");
    println!();
}

/// Print usage examples
pub fn print_examples() {
    println!("EXAMPLES");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    println!("Minimal input (h2o.inp):");
    println!();
    println!("    electron_number = 10");
    println!("    point_group = C2v");
    println!();
    println!("    *ORBITALS");
    println!("    E1 1 inactive  -20.55");
    println!("    E1 2 inactive   -1.33");
    println!("    E1 3 active     -0.69");
    println!("    E1 4 active     -0.56");
    println!("    E1 5 active     -0.49");
    println!("    E1 6 active      0.21");
    println!("    E1 7 secondary   0.30");
    println!("    E1 8 unused      1.20");
    println!("    *");
    println!();
    println!("Run:");
    println!("    dcaspt2-input h2o.inp");
    println!();
    println!("Writes active.ivo.inp (IVO parameters) and active.inp (CASPT2 input),");
    println!("and prints the spinor summary with the recommended MOLTRA setting.");
    println!();
    println!("RAS calculation:");
    println!();
    println!("    ras1_max_hole = 2");
    println!("    ras3_max_electron = 2");
    println!("    *CLASSIFY");
    println!("    E1 ras1 2");
    println!("    E1 ras3 6..7");
    println!("    *");
    println!();
}

/// Print single keyword
fn print_keyword(keyword: &Keyword) {
    let required_str = if keyword.required { " [REQUIRED]" } else { "" };

    println!("{}{}", keyword.name, required_str);
    println!("    {}", keyword.description);

    if let Some(default) = keyword.default_value {
        println!("    Default: {}", default);
    }

    if let Some(example) = keyword.example {
        println!("    Example: {}", example);
    }
}
