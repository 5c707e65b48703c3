use crate::category::Category;
use crate::settings::GeneralSettings;
use std::fs;
use std::path::{Path, PathBuf};

/// Template generator for creating orbital-table input files from orbital listings
///
/// A listing carries `electron_number` and `point_group` header lines followed
/// by one `symmetry index energy` row per Kramers pair, in any order. Rows are
/// sorted by energy and given a default classification around the Fermi level.
pub fn generate_template_from_listing<P: AsRef<Path>>(
    listing_file: P,
    defaults: &GeneralSettings,
) -> Result<String, Box<dyn std::error::Error>> {
    let listing_file = listing_file.as_ref();

    if !listing_file.exists() {
        return Err(format!("File not found: {}", listing_file.display()).into());
    }

    let content = fs::read_to_string(listing_file)?;
    let listing = extract_listing(&content)?;
    let listing_path = listing_file.canonicalize()?;

    Ok(generate_template(listing, defaults, &listing_path))
}

struct Listing {
    electron_number: u32,
    point_group: Option<String>,
    rows: Vec<ListingRow>,
}

struct ListingRow {
    symmetry: String,
    index: u32,
    energy: f64,
}

/// Extract header values and orbital rows from a listing
fn extract_listing(content: &str) -> Result<Listing, Box<dyn std::error::Error>> {
    let mut electron_number = None;
    let mut point_group = None;
    let mut rows = Vec::new();

    for line in content.lines() {
        let trimmed = match line.find('#') {
            Some(pos) => line[..pos].trim(),
            None => line.trim(),
        };
        if trimmed.is_empty() {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            match key.trim().to_lowercase().as_str() {
                "electron_number" | "nelec" => electron_number = Some(value.trim().parse::<u32>()?),
                "point_group" => point_group = Some(value.trim().to_string()),
                _ => {}
            }
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(format!("Invalid listing: malformed orbital line '{}'", trimmed).into());
        }
        rows.push(ListingRow {
            symmetry: parts[0].to_string(),
            index: parts[1].parse::<u32>()?,
            energy: parts[2].parse::<f64>()?,
        });
    }

    let electron_number =
        electron_number.ok_or("Invalid listing: electron_number is missing")?;
    if rows.is_empty() {
        return Err("Invalid listing: no orbitals found".into());
    }

    // Stable sort keeps listing order for degenerate energies
    rows.sort_by(|a, b| a.energy.total_cmp(&b.energy));

    Ok(Listing {
        electron_number,
        point_group,
        rows,
    })
}

/// Default category for the row at `position` in energy order
fn default_category(position: usize, occupied: usize, defaults: &GeneralSettings) -> Category {
    let active_occupied = defaults.default_active_occupied as usize;
    let active_virtual = defaults.default_active_virtual as usize;

    if position < occupied {
        if position + active_occupied >= occupied {
            Category::Active
        } else {
            Category::Inactive
        }
    } else if position < occupied + active_virtual {
        Category::Active
    } else {
        Category::Secondary
    }
}

/// Generate the template input file content
fn generate_template(listing: Listing, defaults: &GeneralSettings, listing_path: &Path) -> String {
    let listing_name = listing_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("orbitals.txt");
    let occupied = listing.electron_number.div_ceil(2) as usize;

    let mut rows = String::new();
    for (position, row) in listing.rows.iter().enumerate() {
        let category = default_category(position, occupied, defaults);
        rows.push_str(&format!(
            "{:<6} {:>4}  {:<10} {:>14.6}\n",
            row.symmetry,
            row.index,
            category.keyword(),
            row.energy
        ));
    }

    let point_group_line = match &listing.point_group {
        Some(pg) => format!("point_group = {}", pg),
        None => "#point_group = C1 # not found in the listing; without it no memory estimate is printed".to_string(),
    };

    format!(
        r#"# Generated from {listing_name}
#This subset is required. It describes the molecule.
electron_number = {electron_number}
{point_group_line}
#moltra_scheme = 4 # written as .scheme when set

#This subset is optional. It controls the CASPT2 calculation. Shown here are the default values.
totsym = 1
selectroot = 1
diracver = {diracver}
eshift = 0.0
pshift = 0.0
ras1_max_hole = 0 # only used when ras1 orbitals are selected
ras3_max_electron = 0 # only used when ras3 orbitals are selected

#Between *ORBITALS and *, classify every Kramers pair as
#unused, inactive, ras1, active (ras2), ras3 or secondary. Rows are sorted by energy.
*ORBITALS
{rows}*

#Between *CLASSIFY and *, reclassify orbitals by range, e.g. "E1u ras3 4..6 9".
*CLASSIFY
*
"#,
        listing_name = listing_name,
        electron_number = listing.electron_number,
        point_group_line = point_group_line,
        diracver = defaults.default_diracver,
        rows = rows,
    )
}

/// Write template to file
pub fn write_template_to_file<P: AsRef<Path>>(
    template: &str,
    output_path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = output_path.as_ref();

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(output_path, template)?;
    Ok(())
}

/// Get default output filename based on the listing file
pub fn get_default_output_path<P: AsRef<Path>>(listing_file: P) -> PathBuf {
    let listing_file = listing_file.as_ref();
    let stem = listing_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template");

    PathBuf::from(format!("{}.inp", stem))
}

/// Validate file extension
pub fn is_supported_format(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "txt" | "out" | "orb"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_input_str;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn listing_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_is_supported_format() {
        assert!(is_supported_format(Path::new("orbitals.txt")));
        assert!(is_supported_format(Path::new("dirac.OUT")));
        assert!(is_supported_format(Path::new("mol.orb")));
        assert!(!is_supported_format(Path::new("mol.xyz")));
        assert!(!is_supported_format(Path::new("orbitals")));
    }

    #[test]
    fn test_get_default_output_path() {
        let path = get_default_output_path(Path::new("orbitals.txt"));
        assert_eq!(path.to_str().unwrap(), "orbitals.inp");

        let path = get_default_output_path(Path::new("/path/to/h2o.out"));
        assert_eq!(path.to_str().unwrap(), "h2o.inp");
    }

    #[test]
    fn test_default_classification() {
        // 10 electrons -> 5 occupied rows
        let defaults = GeneralSettings::default();
        let categories: Vec<Category> = (0..9).map(|p| default_category(p, 5, &defaults)).collect();
        assert_eq!(
            categories,
            vec![
                Category::Inactive,
                Category::Inactive,
                Category::Inactive,
                Category::Active,
                Category::Active,
                Category::Active,
                Category::Active,
                Category::Secondary,
                Category::Secondary,
            ]
        );
    }

    #[test]
    fn test_generated_template_parses() {
        let file = listing_file(
            "electron_number = 4\npoint_group = C2v\n\
             E1 3  0.40\nE1 1 -1.50\nE1 2 -0.60\nE1 4  0.90\nE1 5  2.00\n",
        );
        let defaults = GeneralSettings {
            default_active_occupied: 1,
            default_active_virtual: 1,
            ..GeneralSettings::default()
        };
        let template = generate_template_from_listing(file.path(), &defaults).unwrap();

        let data = parse_input_str(&template).unwrap();
        assert_eq!(data.info.electron_number, 4);
        let order: Vec<u32> = data.snapshot.entries().iter().map(|e| e.index).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert_eq!(data.snapshot.category_of("E1", 1), Some(Category::Inactive));
        assert_eq!(data.snapshot.category_of("E1", 2), Some(Category::Active));
        assert_eq!(data.snapshot.category_of("E1", 3), Some(Category::Active));
        assert_eq!(data.snapshot.category_of("E1", 4), Some(Category::Secondary));
    }

    #[test]
    fn test_listing_without_electrons_fails() {
        let file = listing_file("E1 1 -1.0\n");
        assert!(generate_template_from_listing(file.path(), &GeneralSettings::default()).is_err());
    }
}
