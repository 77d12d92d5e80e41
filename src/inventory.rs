//! Directory inventory
//!
//! Enumerates one directory (no recursion) into a bounded, ordered list of
//! entry names. Order is whatever the filesystem yields.

use std::fs;
use std::path::Path;

use crate::error::InventoryError;
use crate::logging::*;
use crate::protocol::types::MAX_FILENAME;
use crate::validation;

/// Entry names of one directory, in enumeration order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryListing {
	entries: Vec<String>,
}

impl DirectoryListing {
	/// Build a listing from names, enforcing the same bounds as `scan`
	pub fn from_entries(entries: Vec<String>, max_entries: usize) -> Result<Self, InventoryError> {
		if entries.len() > max_entries {
			return Err(InventoryError::TooManyEntries { max: max_entries });
		}
		for name in &entries {
			check_name(name)?;
		}
		Ok(Self { entries })
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[String] {
		&self.entries
	}

	/// Exact, case-sensitive membership test
	pub fn contains(&self, name: &str) -> bool {
		self.entries.iter().any(|e| e == name)
	}
}

fn check_name(name: &str) -> Result<(), InventoryError> {
	validation::validate_entry_name(name)
		.map_err(|_| InventoryError::NameTooLong { name: name.to_string(), max: MAX_FILENAME })
}

/// Enumerate `dir`, skipping the `.` and `..` pseudo-entries
///
/// Fails if the directory cannot be read or holds more than `max_entries`
/// entries. Names that are not valid UTF-8 cannot be requested by a peer and
/// are skipped with a warning.
pub fn scan(dir: &Path, max_entries: usize) -> Result<DirectoryListing, InventoryError> {
	let read_dir = fs::read_dir(dir)
		.map_err(|e| InventoryError::Unreadable { path: dir.to_path_buf(), source: e })?;

	let mut entries = Vec::new();
	for entry_result in read_dir {
		let entry = entry_result
			.map_err(|e| InventoryError::Unreadable { path: dir.to_path_buf(), source: e })?;

		let name = match entry.file_name().into_string() {
			Ok(name) => name,
			Err(raw) => {
				warn!("Skipping entry with non UTF-8 name: {:?}", raw);
				continue;
			}
		};
		if name == "." || name == ".." {
			continue;
		}

		check_name(&name)?;
		if entries.len() == max_entries {
			return Err(InventoryError::TooManyEntries { max: max_entries });
		}
		entries.push(name);
	}

	debug!("Scanned {}: {} entries", dir.display(), entries.len());
	Ok(DirectoryListing { entries })
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeSet;
	use tempfile::TempDir;

	fn names(listing: &DirectoryListing) -> BTreeSet<String> {
		listing.entries().iter().cloned().collect()
	}

	#[test]
	fn test_scan_empty_directory() {
		let dir = TempDir::new().unwrap();
		let listing = scan(dir.path(), 100).unwrap();
		assert!(listing.is_empty());
		assert_eq!(listing.len(), 0);
	}

	#[test]
	fn test_scan_counts_files_and_directories() {
		let dir = TempDir::new().unwrap();
		for i in 0..7 {
			fs::write(dir.path().join(format!("file{}.txt", i)), b"x").unwrap();
		}
		fs::create_dir(dir.path().join("subdir")).unwrap();
		fs::write(dir.path().join("subdir").join("nested.txt"), b"y").unwrap();

		let listing = scan(dir.path(), 100).unwrap();
		assert_eq!(listing.len(), 8);
		let got = names(&listing);
		assert!(got.contains("subdir"));
		assert!(!got.contains("nested.txt"));
		assert!(!got.contains("."));
		assert!(!got.contains(".."));
	}

	#[test]
	fn test_scan_at_the_bound() {
		let dir = TempDir::new().unwrap();
		for i in 0..5 {
			fs::write(dir.path().join(format!("f{}", i)), b"").unwrap();
		}
		assert_eq!(scan(dir.path(), 5).unwrap().len(), 5);
		assert!(matches!(scan(dir.path(), 4), Err(InventoryError::TooManyEntries { max: 4 })));
	}

	#[test]
	fn test_scan_missing_directory() {
		let dir = TempDir::new().unwrap();
		let missing = dir.path().join("gone");
		assert!(matches!(scan(&missing, 100), Err(InventoryError::Unreadable { .. })));
	}

	#[test]
	fn test_contains_is_exact_and_case_sensitive() {
		let listing =
			DirectoryListing::from_entries(vec!["Readme.md".to_string(), "a.txt".to_string()], 100)
				.unwrap();
		assert!(listing.contains("Readme.md"));
		assert!(!listing.contains("readme.md"));
		assert!(!listing.contains("a.tx"));
		assert!(!listing.contains(""));
	}

	#[test]
	fn test_from_entries_enforces_bounds() {
		let too_many: Vec<String> = (0..3).map(|i| i.to_string()).collect();
		assert!(DirectoryListing::from_entries(too_many, 2).is_err());
		let too_long = vec!["n".repeat(MAX_FILENAME + 1)];
		assert!(matches!(
			DirectoryListing::from_entries(too_long, 10),
			Err(InventoryError::NameTooLong { .. })
		));
	}
}

// vim: ts=4
