use serde::{Deserialize, Serialize};

/// Career achievements. Unlocks are persisted by label, so labels never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstReport,
    Prolific,
    FirstPlacement,
    BangTheTable,
    Qualified,
    ClubScout,
    HeadScout,
    Director,
    DebtFree,
    BackFromTheBrink,
    StoryTeller,
    Globetrotter,
    Respected,
    FullStaff,
}

labelled_enum!(AchievementId {
    FirstReport => "first_report",
    Prolific => "prolific",
    FirstPlacement => "first_placement",
    BangTheTable => "bang_the_table",
    Qualified => "qualified",
    ClubScout => "club_scout",
    HeadScout => "head_scout",
    Director => "director",
    DebtFree => "debt_free",
    BackFromTheBrink => "back_from_the_brink",
    StoryTeller => "story_teller",
    Globetrotter => "globetrotter",
    Respected => "respected",
    FullStaff => "full_staff",
});
