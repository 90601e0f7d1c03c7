//! Builds a small playlist, renders it, clicks a track and removes another.
//! Logs go to `playlist.log`.

use serde_json::json;
use simplelog::LevelFilter;
use trellis::logging::init_file_logger;
use trellis::prelude::*;
use viewdom::Selector;

struct Playlist {
    name: String,
}

impl View for Playlist {
    fn class_name(&self) -> Option<String> {
        Some("playlist".into())
    }

    fn template(&self) -> Option<String> {
        Some(r#"<h2><%- name %></h2><ol class="tracks"></ol><p class="footer">end</p>"#.into())
    }

    fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
        cx.render_template(&json!({ "name": self.name }))
    }
}

struct Track {
    title: String,
    liked: bool,
}

impl View for Track {
    fn tag(&self) -> &str {
        "li"
    }

    fn template(&self) -> Option<String> {
        Some(r#"<span><%- title %></span><button class="like">like</button>"#.into())
    }

    fn events(&self) -> Vec<EventBinding> {
        vec![EventBinding::parse("click .like", "toggle_like")]
    }

    fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
        cx.render_template(&json!({ "title": self.title }))
    }

    fn handle(&mut self, handler: &str, _event: &DomEvent, cx: &mut ViewContext<'_>) {
        if handler == "toggle_like" {
            self.liked = !self.liked;
            let surface = cx.surface();
            if let Some(element) = cx.document_mut().element_mut(surface) {
                element.set_attribute("data-liked", self.liked.to_string());
            }
        }
    }
}

fn main() -> Result<()> {
    init_file_logger("playlist.log", LevelFilter::Trace)?;

    let mut tree = ViewTree::new();
    let playlist = tree.insert(Playlist {
        name: "Evening".into(),
    });
    let mut tracks = Vec::new();
    for title in ["Intro", "Night & Day", "Outro"] {
        let track = tree.insert(Track {
            title: title.into(),
            liked: false,
        });
        tree.append_to(playlist, track, ".tracks")?;
        tracks.push(track);
    }
    let header = tree.insert(Track {
        title: "Pinned".into(),
        liked: false,
    });
    tree.prepend_to(playlist, header, ".tracks")?;

    tree.render(playlist)?;
    if let Some(surface) = tree.surface(playlist) {
        println!("{}\n", tree.document().markup(surface));
    }

    let second = tree.surface(tracks[1]).and_then(|surface| {
        let like = Selector::parse(".like").ok()?;
        tree.document().query(surface, &like)
    });
    if let Some(button) = second {
        let handled = tree.dispatch(button, "click");
        println!("click handled by {handled} view(s)\n");
    }

    tree.remove(tracks[0]);
    if let Some(view) = tree.view_mut::<Playlist>(playlist) {
        view.name = "Late evening".into();
    }
    tree.render(playlist)?;

    if let Some(surface) = tree.surface(playlist) {
        println!("{}", tree.document().markup(surface));
    }
    Ok(())
}
