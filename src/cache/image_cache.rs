use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::api::ScryfallClient;
use crate::error::{Error, Result};
use crate::models::Printing;

const IMAGE_EXTENSION: &str = "jpg";

/// Number and total size of cached images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub file_count: usize,
    pub total_size_bytes: u64,
}

impl CacheStats {
    pub fn total_size_mb(&self) -> f64 {
        self.total_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Persistent cache for card face images
/// Stores images as files in the cache directory, one per printing and face
pub struct ImageCache {
    cache_dir: PathBuf,
}

impl ImageCache {
    /// Create an image cache rooted at `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        let cache_dir = cache_dir.into();

        // Create directory if needed
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            log::warn!("Failed to create image cache directory: {}", e);
        }

        log::debug!("Image cache directory: {:?}", cache_dir);
        Self { cache_dir }
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Generate a filename from set code, collector number and face index
    fn filename(set_code: &str, collector_number: &str, face_index: usize) -> String {
        let collector: String = collector_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "{}_{}_{}.{}",
            set_code.to_lowercase(),
            collector,
            face_index,
            IMAGE_EXTENSION
        )
    }

    /// Get the full path for a cached face image
    pub fn path(&self, printing: &Printing, face_index: usize) -> PathBuf {
        self.cache_dir.join(Self::filename(
            &printing.set_code,
            &printing.collector_number,
            face_index,
        ))
    }

    /// Check if a face image is cached
    pub fn contains(&self, printing: &Printing, face_index: usize) -> bool {
        self.path(printing, face_index).is_file()
    }

    /// Store a face image in the cache and return its path.
    ///
    /// The bytes go to a temporary file in the cache directory that is renamed
    /// into place, so an interrupted write never leaves a partial image behind.
    pub fn insert(&self, printing: &Printing, face_index: usize, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.path(printing, face_index);

        let mut temp_file = NamedTempFile::new_in(&self.cache_dir)?;
        temp_file.write_all(bytes)?;
        temp_file.persist(&path).map_err(|e| e.error)?;
        log::debug!(
            "Cached image for {}/{} face {}",
            printing.set_code,
            printing.collector_number,
            face_index
        );
        Ok(path)
    }

    /// Return the cached image path, downloading the face image on a miss
    pub fn get_or_download(
        &self,
        printing: &Printing,
        client: &ScryfallClient,
        face_index: usize,
    ) -> Result<PathBuf> {
        if self.contains(printing, face_index) {
            log::debug!(
                "Image cache hit for {}/{} face {}",
                printing.set_code,
                printing.collector_number,
                face_index
            );
            return Ok(self.path(printing, face_index));
        }

        let face = printing.faces.get(face_index).ok_or_else(|| {
            Error::NoImageAvailable(format!("{} (face {})", printing.name, face_index))
        })?;

        log::info!(
            "Image cache miss for {}/{} face {}, fetching from Scryfall",
            printing.set_code,
            printing.collector_number,
            face_index
        );
        let bytes = client.fetch_image(&face.image_uri_large)?;

        self.insert(printing, face_index, &bytes)
    }

    fn cached_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == IMAGE_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Count and total size of cached images
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        for path in self.cached_files()? {
            stats.file_count += 1;
            stats.total_size_bytes += std::fs::metadata(&path)?.len();
        }
        Ok(stats)
    }

    /// Remove all cached images, returning how many were deleted
    pub fn clear(&self) -> Result<usize> {
        let files = self.cached_files()?;
        for path in &files {
            std::fs::remove_file(path)?;
        }
        log::info!("Removed {} cached images from {:?}", files.len(), self.cache_dir);
        Ok(files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Face;
    use tempfile::TempDir;

    fn create_test_cache() -> (ImageCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = ImageCache::new(temp_dir.path());
        (cache, temp_dir)
    }

    fn printing(set: &str, cn: &str, faces: usize) -> Printing {
        Printing {
            name: "Test Card".to_string(),
            set_code: set.to_string(),
            set_name: "Test Set".to_string(),
            collector_number: cn.to_string(),
            release_date: None,
            is_double_faced: faces == 2,
            faces: (0..faces)
                .map(|index| Face {
                    index,
                    image_uri_small: None,
                    image_uri_large: format!("https://example.com/{index}.jpg"),
                })
                .collect(),
            related: Vec::new(),
        }
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(ImageCache::filename("LEA", "161", 0), "lea_161_0.jpg");
        assert_eq!(ImageCache::filename("isd", "51", 1), "isd_51_1.jpg");
    }

    #[test]
    fn test_filename_sanitizes_collector_number() {
        assert_eq!(ImageCache::filename("plst", "2XM-1", 0), "plst_2XM-1_0.jpg");
        assert_eq!(ImageCache::filename("pm19", "1★", 0), "pm19_1__0.jpg");
        assert_eq!(ImageCache::filename("sld", "../x", 0), "sld____x_0.jpg");
    }

    #[test]
    fn test_faces_cached_separately() {
        let (cache, _temp_dir) = create_test_cache();
        let dfc = printing("isd", "51", 2);

        cache.insert(&dfc, 0, &[1, 1]).unwrap();
        assert!(cache.contains(&dfc, 0));
        assert!(!cache.contains(&dfc, 1));

        cache.insert(&dfc, 1, &[2, 2]).unwrap();
        assert_eq!(std::fs::read(cache.path(&dfc, 0)).unwrap(), vec![1, 1]);
        assert_eq!(std::fs::read(cache.path(&dfc, 1)).unwrap(), vec![2, 2]);
    }

    #[test]
    fn test_set_code_case_insensitive() {
        let (cache, _temp_dir) = create_test_cache();
        cache.insert(&printing("LEA", "161", 1), 0, &[1, 2, 3]).unwrap();

        assert!(cache.contains(&printing("lea", "161", 1), 0));
        assert!(cache.contains(&printing("Lea", "161", 1), 0));
    }

    #[test]
    fn test_insert_overwrites_existing() {
        let (cache, _temp_dir) = create_test_cache();
        let card = printing("lea", "100", 1);

        cache.insert(&card, 0, &[1, 2, 3]).unwrap();
        let path = cache.insert(&card, 0, &[4, 5, 6, 7]).unwrap();

        assert_eq!(std::fs::read(path).unwrap(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_insert_leaves_only_the_final_file() {
        let (cache, temp_dir) = create_test_cache();
        let card = printing("m10", "146", 1);

        let path = cache.insert(&card, 0, &[0xFF, 0xD8, 0xFF]).unwrap();

        let names: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("m10_146_0.jpg")]);
        assert_eq!(std::fs::read(path).unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_stats_and_clear() {
        let (cache, _temp_dir) = create_test_cache();
        assert_eq!(cache.stats().unwrap(), CacheStats::default());

        cache.insert(&printing("lea", "1", 1), 0, &[0; 100]).unwrap();
        cache.insert(&printing("lea", "2", 1), 0, &[0; 50]).unwrap();
        // Non-image files are left alone
        std::fs::write(cache.cache_dir().join("notes.txt"), "keep me").unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size_bytes, 150);

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.stats().unwrap().file_count, 0);
        assert!(cache.cache_dir().join("notes.txt").exists());
    }

    #[test]
    fn test_stats_on_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ImageCache::new(temp_dir.path().join("images"));
        std::fs::remove_dir(cache.cache_dir()).unwrap();

        assert_eq!(cache.stats().unwrap().file_count, 0);
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn test_total_size_mb() {
        let stats = CacheStats {
            file_count: 1,
            total_size_bytes: 3 * 1024 * 1024 / 2,
        };
        assert!((stats.total_size_mb() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_files_persist_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let card = printing("lea", "123", 1);

        {
            let cache = ImageCache::new(temp_dir.path());
            cache.insert(&card, 0, &[10, 20, 30]).unwrap();
        }

        {
            let cache = ImageCache::new(temp_dir.path());
            assert!(cache.contains(&card, 0));
            assert_eq!(std::fs::read(cache.path(&card, 0)).unwrap(), vec![10, 20, 30]);
        }
    }
}
