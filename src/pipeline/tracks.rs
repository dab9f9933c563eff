use crate::{error::ServiceError, pipeline::Paginator, spotify::MusicService, types::ReleaseRef};

/// Track ids of one release. `error` is set when the walk stopped early;
/// `track_ids` then holds what was read before the failure.
#[derive(Debug, Clone, Default)]
pub struct ExpandedRelease {
    pub track_ids: Vec<String>,
    pub error: Option<ServiceError>,
}

pub async fn expand_release<C>(client: &C, release: &ReleaseRef) -> ExpandedRelease
where
    C: MusicService + ?Sized,
{
    let release_id = release.id.as_str();
    let mut tracks = Paginator::new(move |cursor| client.release_tracks_page(release_id, cursor));
    let mut expanded = ExpandedRelease::default();

    loop {
        match tracks.next().await {
            Ok(Some(track_id)) => expanded.track_ids.push(track_id),
            Ok(None) => break,
            Err(e) => {
                log::warn!(
                    "track listing of release {} ({}) failed after {} tracks: {e}",
                    release.name,
                    release.id,
                    expanded.track_ids.len()
                );
                expanded.error = Some(e);
                break;
            }
        }
    }

    expanded
}
