//! Workout plan catalog - the fixed three-day split

/// One predefined workout day.
#[derive(Debug, Clone)]
pub struct SessionDef {
    pub key: &'static str,
    pub name: &'static str,
    pub exercises: &'static [&'static str],
    pub warmup: &'static [&'static str],
    pub cooldown: &'static [&'static str],
}

pub const SESSION_DEFS: &[SessionDef] = &[
    SessionDef {
        key: "A",
        name: "A – Upper Body",
        exercises: &[
            "Bench Press",
            "Pull-ups / Lat Pulldown",
            "DB Shoulder Press",
            "Incline DB Press",
            "Seated Cable Row",
            "Lateral Raises",
            "Barbell Curl",
            "Rope Pushdown",
        ],
        warmup: &[
            "Row / SkiErg – 2:00 easy",
            "Band pull-aparts – 2×15",
            "Band external rotations – 2×12/side",
        ],
        cooldown: &[
            "Chest stretch – 0:30–0:40",
            "Lat stretch – 0:30/side",
            "Triceps stretch – 0:30/side",
        ],
    },
    SessionDef {
        key: "B",
        name: "B – Lower Body (Running)",
        exercises: &[
            "Back Squat",
            "Romanian Deadlift",
            "Bulgarian Split Squat",
            "Leg Press",
            "Hamstring Curl",
            "Standing Calf Raise",
            "Single-Leg Step-Up",
        ],
        warmup: &[
            "Bike / incline walk – 2:00 easy",
            "World’s greatest stretch – 5/side",
            "Glute bridges – 2×12",
        ],
        cooldown: &[
            "Hip flexor stretch – 0:45/side",
            "Hamstring stretch – 0:45/side",
            "Calf stretch – 0:30/side",
        ],
    },
    SessionDef {
        key: "C",
        name: "C – Core & Lower Back",
        exercises: &[
            "Hanging Leg Raises",
            "Cable Crunch",
            "Ab Wheel Rollout",
            "Back Extension (45°)",
            "Dead Bug",
            "Pallof Press",
            "Farmer’s Carry",
        ],
        warmup: &[
            "Cat–cow – 8 reps",
            "Dead bug – 2×8/side",
            "Bird dog – 2×6/side",
        ],
        cooldown: &[
            "Child’s pose – 1:00",
            "Cobra / sphinx – 0:30",
            "Supine rotation – 0:30/side",
        ],
    },
];

pub fn find_session_def(key: &str) -> Option<&'static SessionDef> {
    SESSION_DEFS.iter().find(|s| s.key == key)
}

/// Case-insensitive substring filter over an exercise list.
pub fn filter_exercises<'a>(exercises: &'a [String], query: &str) -> Vec<&'a str> {
    let q = query.trim().to_lowercase();
    exercises
        .iter()
        .filter(|x| q.is_empty() || x.to_lowercase().contains(&q))
        .map(|x| x.as_str())
        .collect()
}
