//! The built-in "Echoes of Ellidra" prologue.
//!
//! The player wakes in the ruins of Valdaren, meets Kael, and must find a
//! way to understand them before the glyph on their wrist can be read.

use crate::error::DialogueResult;
use crate::scene::{Choice, Comparison, DialogueNode, Effect, Requirement};
use crate::story::{Story, StoryFile};

/// Id of the first scene.
pub const START_SCENE: &str = "awakening";

/// The prologue as authored content.
pub fn prologue_file() -> StoryFile {
    StoryFile::new("Echoes of Ellidra", START_SCENE)
        .with_memory(
            "first_light",
            "First Light",
            "A lantern swinging over dark water, and a voice counting in a language you once knew.",
        )
        .with_memory(
            "glyph_memory",
            "The Glyph",
            "Your own hand carving the mark into your wrist, so that you would not forget.",
        )
        .with_memory(
            "sanctum_memory",
            "The Sanctum",
            "A door of pale stone that opened only for those who remembered their names.",
        )
        .with_faction("wardens", 50)
        .with_faction("ashen_circle", 50)
        .with_scene(
            DialogueNode::new(
                START_SCENE,
                "Narrator",
                [
                    "Cold stone presses against your cheek.",
                    "Somewhere above, wind moves through broken arches. You do not remember falling asleep here. You do not remember much of anything.",
                ],
            )
            .with_effect(Effect::add_consequence("prologue", "awakened"))
            .with_auto_advance("mysterious_figure_approach"),
        )
        .with_scene(
            DialogueNode::new(
                "mysterious_figure_approach",
                "Narrator",
                "Footsteps. A hooded figure steps through the ruins, lantern raised. The light catches a glyph on your wrist and something stirs behind your eyes.",
            )
            .with_effect(Effect::unlock_memory("first_light"))
            .with_auto_advance("kael_greeting"),
        )
        .with_scene(
            DialogueNode::new(
                "kael_greeting",
                "Kael",
                "\"Veshta nor ellidra? Ka'then vos mirae.\" The figure lowers their hood and waits.",
            )
            .with_choice(
                Choice::new("touch_glyph", "Read the words etched into the glyph aloud")
                    .with_requirement(Requirement::language("english"))
                    .with_effect(Effect::unlock_memory("glyph_memory"))
                    .with_effect(Effect::faction_influence("wardens", 10))
                    .with_effect(Effect::add_consequence("kael_greeting", "touched_glyph"))
                    .with_next_scene("figure_response_glyph"),
            )
            .with_choice(
                Choice::new("listen_closely", "Listen closely to the stranger's words")
                    .with_effect(Effect::add_consequence("kael_greeting", "listened"))
                    .with_next_scene("kael_lesson"),
            )
            .with_choice(
                Choice::new("back_away", "Back away slowly")
                    .with_effect(Effect::faction_influence("wardens", -5))
                    .with_effect(Effect::add_consequence("kael_greeting", "backed_away"))
                    .with_next_scene("figure_response_retreat"),
            ),
        )
        .with_scene(
            DialogueNode::new(
                "kael_lesson",
                "Kael",
                [
                    "Kael kneels and draws shapes in the dust, naming each one slowly.",
                    "Word by word, the sounds rearrange themselves into meaning. \"Better,\" Kael says, and you understand.",
                ],
            )
            .with_effect(Effect::learn_language("english"))
            .with_auto_advance("kael_greeting"),
        )
        .with_scene(
            DialogueNode::new(
                "figure_response_glyph",
                "Kael",
                "\"So the mark still answers you.\" Kael's eyes widen. \"Then you are one of the Wardens' lost. Come. There is not much time.\"",
            )
            .with_auto_advance("crossroads"),
        )
        .with_scene(
            DialogueNode::new(
                "figure_response_retreat",
                "Kael",
                "Kael raises an empty hand. \"Easy. I am not the one you should fear in Valdaren.\"",
            )
            .with_auto_advance("crossroads"),
        )
        .with_scene(
            DialogueNode::new(
                "crossroads",
                "Kael",
                "\"The sanctum lies north, the village east. Where will you go?\"",
            )
            .with_choice(
                Choice::new("go_to_sanctum", "Head for the sanctum")
                    .with_requirement(Requirement::memory("glyph_memory"))
                    .with_next_scene("sanctum_gate"),
            )
            .with_choice(
                Choice::new("follow_to_village", "Follow Kael to the village")
                    .with_next_scene("village_edge"),
            )
            .with_choice(
                Choice::new("ask_about_wardens", "Ask who the Wardens are")
                    .with_requirement(Requirement::influence(
                        "wardens",
                        Comparison::AtLeast,
                        55,
                    ))
                    .with_next_scene("wardens_explained"),
            )
            .with_choice(
                Choice::new("apologize", "Apologize for backing away")
                    .with_requirement(Requirement::consequence_includes(
                        "kael_greeting",
                        "backed_away",
                    ))
                    .with_next_scene("kael_forgives"),
            ),
        )
        .with_scene(
            DialogueNode::new(
                "wardens_explained",
                "Kael",
                "\"Keepers of the old roads. They swore to remember what the Ashen Circle wanted forgotten.\"",
            )
            .with_effect(Effect::faction_influence("ashen_circle", -5))
            .with_auto_advance("village_edge"),
        )
        .with_scene(
            DialogueNode::new(
                "kael_forgives",
                "Kael",
                "Kael's mouth twitches into something like a smile. \"Caution keeps people alive here.\"",
            )
            .with_effect(Effect::faction_influence("wardens", 5))
            .with_auto_advance("village_edge"),
        )
        .with_scene(
            DialogueNode::new(
                "sanctum_gate",
                "Narrator",
                "The pale door recognizes the glyph. It opens without a sound.",
            )
            .with_effect(Effect::unlock_memory("sanctum_memory")),
        )
        .with_scene(DialogueNode::new(
            "village_edge",
            "Narrator",
            "Smoke rises from the chimneys of a village that should not exist. The prologue ends here.",
        ))
}

/// The prologue, validated and ready to play.
pub fn prologue() -> DialogueResult<Story> {
    Story::new(prologue_file())
}
