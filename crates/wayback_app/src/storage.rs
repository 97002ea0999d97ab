use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// On-disk layout for one account:
/// `<base>/images/<account>/{media,profile}`.
pub struct AccountDirs {
    pub root: PathBuf,
    pub media: PathBuf,
    pub profile: PathBuf,
}

impl AccountDirs {
    /// Create the full directory tree; both subdirectories exist when this
    /// returns, so the download stage can write without checking.
    pub fn create(base: &Path, account: &str) -> io::Result<Self> {
        let root = base.join("images").join(account);
        let media = root.join("media");
        let profile = root.join("profile");
        fs::create_dir_all(&media)?;
        fs::create_dir_all(&profile)?;
        Ok(Self {
            root,
            media,
            profile,
        })
    }
}

/// Delete `.jpg` files under the media and profile directories whose bytes
/// are not actually JPEG (the archive sometimes serves an error page where
/// an image should be). Returns how many files were removed.
pub fn purge_corrupted(dirs: &AccountDirs) -> io::Result<usize> {
    log::info!("purging any corrupted images in {}", dirs.root.display());

    let mut purged = 0;
    for dir in [&dirs.media, &dirs.profile] {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("jpg") {
                continue;
            }
            match is_jpeg(&path) {
                Ok(true) => {}
                Ok(false) => {
                    if let Err(err) = fs::remove_file(&path) {
                        log::error!("error removing corrupted image {}: {err}", path.display());
                        continue;
                    }
                    log::info!("removed corrupted image: {}", path.display());
                    purged += 1;
                }
                Err(err) => {
                    log::warn!("error checking image file {}: {err}", path.display());
                }
            }
        }
    }

    if purged == 0 {
        log::info!("no corrupted images found");
    } else {
        log::info!("removed {purged} corrupted images");
    }
    Ok(purged)
}

fn is_jpeg(path: &Path) -> io::Result<bool> {
    let mut header = [0u8; 3];
    let mut file = fs::File::open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) => Ok(header == JPEG_MAGIC),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err),
    }
}
