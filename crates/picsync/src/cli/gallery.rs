//! Gallery command handlers: list, upload, delete, sync.

use picsync::{AppContext, GalleryScreen, PicsyncResult, ScreenEvent, TapEffect};

fn print_status(screen: &GalleryScreen) {
    if let Some(status) = screen.status() {
        println!("{}", status);
    }
}

async fn load_everything(screen: &mut GalleryScreen) {
    screen.load_initial().await;
    while *screen.pagination().has_more() {
        screen.load_more().await;
    }
    tracing::debug!(loaded = screen.items().len(), "Loaded whole library");
}

/// Put `ids` into the screen's selection. Returns how many were accepted.
fn select(screen: &mut GalleryScreen, ids: &[String]) -> usize {
    let mut accepted = 0;
    for id in ids {
        let effect = if screen.selection().is_active() {
            screen.tap(id)
        } else {
            screen.long_press(id)
        };
        match effect {
            TapEffect::SelectionStarted(_) | TapEffect::Toggled => accepted += 1,
            TapEffect::Ignored | TapEffect::OpenDetail(_) => println!("Skipping {}", id),
        }
    }
    accepted
}

/// Handle the `list` command
pub async fn list_photos(context: &AppContext, pages: usize) -> PicsyncResult<()> {
    let mut screen = context.gallery_screen();
    screen.load_initial().await;
    for _ in 1..pages.max(1) {
        if screen.load_more().await == 0 && !*screen.pagination().has_more() {
            break;
        }
    }

    for item in screen.items() {
        let mark = if item.is_uploaded { "✓" } else { "·" };
        println!("{} {}\t{}", mark, item.id(), item.photo.file_name);
    }

    let pagination = screen.pagination();
    match pagination.total_count() {
        Some(total) => println!("{} of {} photos loaded", screen.items().len(), total),
        None => println!("{} photos loaded", screen.items().len()),
    }
    print_status(&screen);
    Ok(())
}

/// Handle the `remote` command
pub async fn list_remote(context: &AppContext) -> PicsyncResult<()> {
    let client = context.client();
    let records = client.list_media().await?;
    for record in &records {
        println!(
            "{}\t{}\t{} bytes\t{}\t{}",
            record.id,
            record.original_file_name,
            record.size_bytes,
            record.uploaded_at.to_rfc3339(),
            client.stream_url(&record.id)
        );
    }
    println!("{} files on the server", records.len());
    Ok(())
}

/// Handle the `upload` command
pub async fn upload(context: &AppContext, all: bool, ids: Vec<String>) -> PicsyncResult<()> {
    let mut screen = context.gallery_screen();
    load_everything(&mut screen).await;

    let ids: Vec<String> = if all {
        screen
            .items()
            .iter()
            .filter(|item| !item.is_uploaded)
            .map(|item| item.id().to_string())
            .collect()
    } else {
        ids
    };

    if select(&mut screen, &ids) == 0 {
        println!("Nothing to upload");
        return Ok(());
    }

    screen.upload_selected().await?;
    print_status(&screen);
    Ok(())
}

/// Handle the `delete` command
pub async fn delete(context: &AppContext, ids: Vec<String>) -> PicsyncResult<()> {
    let mut screen = context.gallery_screen();
    load_everything(&mut screen).await;

    if select(&mut screen, &ids) == 0 {
        println!("Nothing to delete");
        return Ok(());
    }

    screen.delete_selected().await?;
    print_status(&screen);
    Ok(())
}

/// Handle the `sync` command
pub async fn sync(context: &AppContext) -> PicsyncResult<()> {
    let mut screen = context.gallery_screen();
    load_everything(&mut screen).await;

    if !screen.trigger_auto_upload() {
        if *context.settings().load_upload_settings().auto_upload() {
            println!("Everything is already uploaded");
        } else {
            println!("Auto-upload is off; enable it with `picsync settings set --auto-upload true`");
        }
        return Ok(());
    }

    while let Some(event) = screen.next_event().await {
        if let ScreenEvent::ItemDone { id, kind } = &event {
            println!("{}: {}", id, kind);
        }
        if screen.handle_event(event).is_some() {
            break;
        }
    }
    print_status(&screen);
    Ok(())
}
