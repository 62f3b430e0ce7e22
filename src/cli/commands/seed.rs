use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::database::models::{PrayerStatus, Role};
use crate::services::directory_service::DirectoryService;
use crate::services::membership_service::MembershipService;
use crate::services::prayer_service::PrayerService;
use crate::services::reaction_service::{ReactionStore, SqlReactionStore};
use crate::services::song_service::SongService;
use crate::services::course_service::CourseService;
use crate::services::user_service::UserService;

/// Load a small demo dataset: one church with its three standard modules,
/// two accounts (one admin, one plain member), a handful of prayers with
/// reactions, a song, and a course. Intended for fresh databases.
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let directory = DirectoryService::new().await?;
    let users = UserService::new().await?;
    let memberships = MembershipService::new().await?;
    let prayers = PrayerService::new().await?;

    let church = directory.create_church("riverside", "Riverside Community Church").await?;
    let nextstep = directory.create_service(church.id, "nextstep", "Next Step").await?;
    let worship = directory.create_service(church.id, "worship", "Worship Team").await?;
    let discipleship = directory
        .create_service(church.id, "discipleship", "Discipleship School")
        .await?;

    let admin = users
        .register("admin@riverside.example", "Anna Leadworthy", "seed-admin-pw")
        .await?;
    let member = users
        .register("member@riverside.example", "Milo Pewsitter", "seed-member-pw")
        .await?;

    for service_id in [nextstep.id, worship.id, discipleship.id] {
        memberships.grant(church.id, service_id, admin.id, Role::Admin).await?;
    }

    let storm = prayers
        .submit(
            church.id,
            nextstep.id,
            "Ruth",
            "Please pray for my family as we rebuild after the storm.",
            Some("family"),
            PrayerStatus::Request,
        )
        .await?;
    prayers
        .submit(
            church.id,
            nextstep.id,
            "Samuel",
            "Found work after eight months of searching. Thank you all!",
            Some("work"),
            PrayerStatus::Answered,
        )
        .await?;
    prayers
        .submit(
            church.id,
            nextstep.id,
            "Deborah",
            "Healing for my mother ahead of her surgery on Friday.",
            Some("health"),
            PrayerStatus::Request,
        )
        .await?;

    let reactions = SqlReactionStore::new();
    reactions.insert(storm.id, admin.id).await?;
    reactions.insert(storm.id, member.id).await?;

    SongService::new()
        .await?
        .create(
            church.id,
            "Great Is Thy Faithfulness",
            Some("Thomas Chisholm"),
            "Great is Thy faithfulness, O God my Father...",
            Some("D"),
            Some("72"),
        )
        .await?;

    let courses = CourseService::new().await?;
    let foundations = courses
        .create_course(
            church.id,
            discipleship.id,
            "Foundations of Faith",
            Some("A six-week introduction for new believers."),
            1,
        )
        .await?;
    courses
        .create_lesson(foundations.id, "Week 1: Grace", "Reading: Ephesians 2...", 1)
        .await?;
    courses
        .create_lesson(foundations.id, "Week 2: Prayer", "Reading: Matthew 6...", 2)
        .await?;

    output_success(
        &output_format,
        "Demo data loaded for church 'riverside'",
        Some(json!({
            "church": church.slug,
            "admin": admin.email,
            "member": member.email,
        })),
    )
}
