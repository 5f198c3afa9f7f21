use std::path::{Path, PathBuf};

use crate::error::ClientError;

pub const DEFAULT_WORKSPACE_ROOT: &str = "/workspace";

/// Where the server stores images uploaded to a job:
/// `<root>/jobs/<job_id>/images`.
///
/// The job id must be one plain path segment so the result stays under
/// `<root>/jobs`.
pub fn job_images_dir(workspace_root: &Path, job_id: &str) -> Result<PathBuf, ClientError> {
    let escapes = matches!(job_id, "" | "." | "..") || job_id.contains(['/', '\\']);
    if escapes {
        return Err(ClientError::InvalidJobId(job_id.to_string()));
    }
    Ok(workspace_root.join("jobs").join(job_id).join("images"))
}

pub fn job_image_path(
    workspace_root: &Path,
    job_id: &str,
    file_name: &str,
) -> Result<PathBuf, ClientError> {
    Ok(job_images_dir(workspace_root, job_id)?.join(file_name))
}
