//! BBCode rendering for the posting destination.
//!
//! Pure templating: given a scene record and its uploaded assets, emit the
//! fixed two-column table layout line by line. Optional pieces (studio logo,
//! tags, poster, screenshots, contact sheet) are omitted entirely when
//! absent, never rendered as empty placeholders.

use common::format::{clean_tag, format_bitrate, format_duration};
use common::scene::{ImageAsset, SceneRecord, VideoFile};

const PAD_IMAGE: &str = "https://hamsterimg.net/images/2025/06/21/pad.png";
const SPACER_IMAGE: &str = "https://hamsterimg.net/images/2025/09/29/space.png";

const DEFAULT_FRAME_RATE: f64 = 29.97;
const DEFAULT_VIDEO_CODEC: &str = "h264";
const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Render the scene into BBCode lines. Deterministic; no I/O.
pub fn render(
    scene: &SceneRecord,
    studio_image: Option<&ImageAsset>,
    performer_images: &[ImageAsset],
    title_override: &str,
) -> Vec<String> {
    let mut lines = Vec::new();

    // Outer table shell, left column.
    lines.push(
        "[bg=#202b33][color=#F5F8FA][font=Helvetica][table=nopad,nball,vat][tr][td=#202b33][/td]"
            .to_string(),
    );
    lines.push("[td=400px,#202b33][bg=90%][size=2]".to_string());

    if let Some(url) = studio_image.and_then(|s| s.url.as_deref()) {
        lines.push(format!("[center][img=100]{}[/img][/center]", url));
    }

    let title = if title_override.is_empty() {
        scene.title.as_deref().unwrap_or("")
    } else {
        title_override
    };
    lines.push(format!("[size=4][font=Arial Black]{}[/font][/size]", title));
    lines.push(format!(
        "[imgnm]{}[/imgnm]{}",
        PAD_IMAGE,
        scene.date.as_deref().unwrap_or("")
    ));

    lines.push("[b]Details[/b]".to_string());
    lines.push(format!(
        "[imgnm]{}[/imgnm]{}",
        PAD_IMAGE,
        scene.details.as_deref().unwrap_or("")
    ));

    let tag_names: Vec<&str> = scene
        .tags
        .iter()
        .map(|t| t.name.as_str())
        .filter(|n| !n.is_empty())
        .collect();
    if !tag_names.is_empty() {
        lines.push("[b]Includes[/b]".to_string());
        lines.push(format!(
            "[imgnm]{}[/imgnm]{}",
            PAD_IMAGE,
            tag_names.join(", ")
        ));
    }

    lines.push("[b]Performers[/b][br]".to_string());
    lines.push("[table=nball,left][tr]".to_string());
    for (index, performer) in scene.performers.iter().enumerate() {
        let image_url = performer_images
            .get(index)
            .and_then(|asset| asset.url.as_deref())
            .unwrap_or("");
        lines.push(format!(
            "[td=#30404d,124px][img=123]{image}[/img][url=/torrents.php?taglist={tag}]\
             [size=3][/size][color=white][bg=90%]{name}[br][/bg][/color][/url][/td]",
            image = image_url,
            tag = clean_tag(&performer.name),
            name = performer.name,
        ));
        if index < scene.performers.len() - 1 {
            lines.push("[td=8px][/td]".to_string());
        }
    }
    lines.push("[td][/td][/tr][/table]".to_string());
    lines.push("[/size][/bg][/td]".to_string());

    // Right column: poster, tech bar, screens, contact sheet.
    lines.push("[td=vat,800px][bg=98%]".to_string());
    if let Some(url) = scene.poster_url.as_deref() {
        lines.push(format!("[imgnm]{}[/imgnm]", url));
    }

    lines.extend(tech_bar(scene.primary_file()));
    lines.push("[size=2]".to_string());

    lines.push("[b]Screens[/b]".to_string());
    if !scene.screenshot_urls.is_empty() {
        let screen_line: String = scene
            .screenshot_urls
            .iter()
            .map(|url| format!("[img=200]{}[/img]", url))
            .collect();
        lines.push(screen_line);
    }

    if let Some(url) = scene
        .contact_sheet_url
        .as_deref()
        .filter(|u| !u.is_empty())
    {
        lines.push("[b]Contact Sheet[/b]".to_string());
        lines.push("[spoiler=Click to view]".to_string());
        lines.push(format!("[img]{}[/img]", url));
        lines.push("[/spoiler]".to_string());
    }

    lines.push("[/size]".to_string());
    lines.push(format!("[img]{}[/img]", SPACER_IMAGE));
    lines.push("[/bg][/td][td=#202b33][/td][/tr][/table][/font][/color][/bg]".to_string());

    lines
}

/// The right-aligned technical specification bar.
fn tech_bar(file: Option<&VideoFile>) -> Vec<String> {
    let default = VideoFile::default();
    let file = file.unwrap_or(&default);

    let duration = format_duration(file.duration);
    let resolution = format!("{}\u{d7}{}", file.width, file.height);
    let frame_rate = if file.frame_rate > 0.0 {
        file.frame_rate
    } else {
        DEFAULT_FRAME_RATE
    };
    let fps = format!("{:.2} fps", frame_rate);
    let bitrate = format_bitrate(file.bit_rate);
    let codec = format!(
        "{}/{}",
        file.video_codec.as_deref().unwrap_or(DEFAULT_VIDEO_CODEC),
        file.audio_codec.as_deref().unwrap_or(DEFAULT_AUDIO_CODEC),
    );

    vec![
        "[bg=#30404d][color=#F0EEEB][size=2]".to_string(),
        "[table=100%,nball,vam][tr][td=16px][/td]".to_string(),
        format!("[td]{}[/td]", duration),
        format!(
            "[td][align=right]mp4   {}   {}   {}   {}[/align][/td]",
            codec, resolution, bitrate, fps
        ),
        "[td=16px][/td][/tr][/table][/size][/color][/bg]".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::scene::{Performer, Tag};

    fn scene_with_file() -> SceneRecord {
        SceneRecord {
            title: Some("Morning Ride".to_string()),
            date: Some("2026-01-15".to_string()),
            details: Some("A long description.".to_string()),
            files: vec![VideoFile {
                path: "/data/Extra/ride.mp4".to_string(),
                duration: 125.0,
                width: 1920,
                height: 1080,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_scene_renders_defaults() {
        // One file, duration 125, 1920x1080, no bitrate/codecs, no
        // tags/performers.
        let output = render(&scene_with_file(), None, &[], "").join("\n");

        assert!(output.contains("[td]2:05[/td]"));
        assert!(output.contains("1920\u{d7}1080"));
        assert!(output.contains("18.22 Mb/s"));
        assert!(output.contains("h264/aac"));
        assert!(output.contains("29.97 fps"));
        assert!(!output.contains("[b]Includes[/b]"));
        // Performers table shell is present but holds no performer cells.
        assert!(output.contains("[b]Performers[/b][br]"));
        assert!(!output.contains("[td=#30404d,124px]"));
    }

    #[test]
    fn test_includes_and_contact_sheet_blocks_are_conditional() {
        let mut scene = scene_with_file();
        let without = render(&scene, None, &[], "").join("\n");
        assert!(!without.contains("[b]Includes[/b]"));
        assert!(!without.contains("[b]Contact Sheet[/b]"));
        assert!(!without.contains("[spoiler=Click to view]"));

        scene.tags = vec![
            Tag {
                name: "outdoor".to_string(),
            },
            Tag {
                name: "roadtrip".to_string(),
            },
        ];
        scene.contact_sheet_url = Some("https://img.example/sheet.jpg".to_string());
        let with = render(&scene, None, &[], "").join("\n");
        assert!(with.contains("[b]Includes[/b]"));
        assert!(with.contains("outdoor, roadtrip"));
        assert!(with.contains("[b]Contact Sheet[/b]"));
        assert!(with.contains("[spoiler=Click to view]"));
        assert!(with.contains("[img]https://img.example/sheet.jpg[/img]"));
    }

    #[test]
    fn test_performer_cells_and_spacers() {
        let mut scene = scene_with_file();
        scene.performers = vec![
            Performer {
                name: "Jane Doe".to_string(),
                image_path: None,
            },
            Performer {
                name: "John Roe".to_string(),
                image_path: None,
            },
        ];
        let assets = vec![
            ImageAsset::new("Jane Doe", Some("https://img.example/jane.jpg".to_string()), None),
            ImageAsset::new("John Roe", None, None),
        ];

        let output = render(&scene, None, &assets, "");
        let joined = output.join("\n");

        assert!(joined.contains("taglist=jane.doe"));
        assert!(joined.contains("[img=123]https://img.example/jane.jpg[/img]"));
        // Second performer's upload failed; the cell renders without a URL.
        assert!(joined.contains("[img=123][/img][url=/torrents.php?taglist=john.roe]"));
        // Exactly one spacer cell between the two entries.
        let spacers = output.iter().filter(|l| l.as_str() == "[td=8px][/td]").count();
        assert_eq!(spacers, 1);
    }

    #[test]
    fn test_title_override_and_studio_logo() {
        let scene = scene_with_file();
        let studio = ImageAsset::new(
            "studio",
            Some("https://img.example/logo.png".to_string()),
            None,
        );

        let output = render(&scene, Some(&studio), &[], "Override Title").join("\n");
        assert!(output.contains("[size=4][font=Arial Black]Override Title[/font][/size]"));
        assert!(output.contains("[center][img=100]https://img.example/logo.png[/img][/center]"));
    }

    #[test]
    fn test_screens_line_concatenates_urls() {
        let mut scene = scene_with_file();
        scene.screenshot_urls = vec![
            "https://img.example/s1.jpg".to_string(),
            "https://img.example/s2.jpg".to_string(),
        ];

        let output = render(&scene, None, &[], "");
        assert!(output.contains(
            &"[img=200]https://img.example/s1.jpg[/img][img=200]https://img.example/s2.jpg[/img]"
                .to_string()
        ));
    }

    #[test]
    fn test_poster_rendered_only_when_present() {
        let mut scene = scene_with_file();
        let without = render(&scene, None, &[], "").join("\n");
        scene.poster_url = Some("https://img.example/poster.jpg".to_string());
        let with = render(&scene, None, &[], "").join("\n");

        assert!(!without.contains("[imgnm]https://img.example/poster.jpg[/imgnm]"));
        assert!(with.contains("[imgnm]https://img.example/poster.jpg[/imgnm]"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = scene_with_file();
        assert_eq!(render(&scene, None, &[], ""), render(&scene, None, &[], ""));
    }

    #[test]
    fn test_explicit_bitrate_and_codecs() {
        let mut scene = scene_with_file();
        scene.files[0].bit_rate = 5_000_000;
        scene.files[0].frame_rate = 59.94;
        scene.files[0].video_codec = Some("hevc".to_string());
        scene.files[0].audio_codec = Some("opus".to_string());

        let output = render(&scene, None, &[], "").join("\n");
        assert!(output.contains("5.00 Mb/s"));
        assert!(output.contains("59.94 fps"));
        assert!(output.contains("hevc/opus"));
    }
}
