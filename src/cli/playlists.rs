use tabled::Table;

use crate::{
    cli::{
        auth::{connect, load_settings},
        progress::spinner,
    },
    error,
    pipeline::Paginator,
    spotify::MusicService,
    success,
    types::{PlaylistSummary, PlaylistTableRow},
    warning,
};

pub async fn playlists(search: Option<String>) {
    let settings = load_settings();
    let client = connect(&settings).await;

    let pb = spinner("Fetching your playlists...");
    let mut pages = Paginator::new(|cursor| client.current_user_playlists_page(cursor));
    let mut playlists: Vec<PlaylistSummary> = match pages.collect_all().await {
        Ok(playlists) => playlists,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch playlists. Err: {}", e);
        }
    };
    pb.finish_and_clear();
    success!("Fetched {} playlists", playlists.len());

    playlists.sort_by_key(|p| p.name.to_lowercase());
    if let Some(search) = search {
        let term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&term));
    }

    if playlists.is_empty() {
        warning!("No matching playlists");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            owner: p.owner,
            tracks: p.track_count,
            id: p.id,
        })
        .collect();
    println!("{}", Table::new(rows));
}
