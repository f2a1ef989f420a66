// =============================================================================
// Kindred Backend Constants
// =============================================================================
// Tuning knobs for the matching engine and the service, kept in one place.

// =============================================================================
// RECOMMENDATION LIMITS
// =============================================================================

/// Number of candidates returned by the ranking step
pub const RECOMMENDATION_LIMIT: usize = 10;

/// Normalized score (percent) a candidate needs to be recommendable
pub const ADMISSION_THRESHOLD_PERCENT: f64 = 25.0;

/// Upper bound of each importance weight
pub const MAX_WEIGHT: u8 = 10;

/// Upper bound of a per-dimension similarity, in points
pub const MAX_DIMENSION_POINTS: f64 = 100.0;

// =============================================================================
// INTEREST OVERLAP
// =============================================================================

/// Points for a requester term that appears verbatim (case-insensitive) in the candidate list
pub const EXACT_TERM_POINTS: f64 = 10.0;

/// Points for a requester term that only shares a keyword group with a candidate term
pub const THEMATIC_TERM_POINTS: f64 = 4.0;

/// Share of the dimension reachable through term matches alone
pub const INTEREST_BASE_POINTS: f64 = 80.0;

/// Bonus once exact matches cover more than half of the longer list
pub const INTEREST_DENSITY_BONUS: f64 = 20.0;

/// Exact-match density that unlocks the bonus (strictly greater than)
pub const INTEREST_DENSITY_THRESHOLD: f64 = 0.5;

// =============================================================================
// COLLABORATION / FOOD / MUSIC
// =============================================================================

/// Both texts name the same strong-signal keyword
pub const COLLAB_STRONG_POINTS: f64 = 60.0;

/// One text names one side of a complementary pair, the other names the other side
pub const COLLAB_COMPLEMENTARY_POINTS: f64 = 40.0;

/// Per broad category present in both texts
pub const COLLAB_CATEGORY_POINTS: f64 = 10.0;

/// Identical favourite food / music
pub const TASTE_EXACT_POINTS: f64 = 100.0;

/// Favourite food / music in the same cuisine or genre bucket
pub const TASTE_BUCKET_POINTS: f64 = 50.0;

// =============================================================================
// LOCATION
// =============================================================================

/// Mean Earth radius used by the haversine distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when a profile stores a non-positive one
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;

/// Distance (km) counted as "very close"
pub const VERY_CLOSE_DISTANCE_KM: f64 = 5.0;

/// Distance (km) counted as "close"
pub const CLOSE_DISTANCE_KM: f64 = 15.0;

/// Flat raw-score bonus for the "very close" band, not scaled by weight
pub const VERY_CLOSE_BONUS: f64 = 30.0;

/// Flat raw-score bonus for the "close" band, not scaled by weight
pub const CLOSE_BONUS: f64 = 15.0;

// =============================================================================
// DEFAULT KEYWORD CATALOGUE
// =============================================================================

/// Thematic interest groups: (group name, keywords)
pub const INTEREST_GROUPS: &[(&str, &[&str])] = &[
    ("music", &["guitar", "piano", "drum", "violin", "bass", "singing", "choir", "dj", "synth", "ukulele", "music"]),
    ("visual", &["painting", "drawing", "sketch", "photography", "illustration", "watercolor", "sculpture", "film", "animation"]),
    ("tech", &["programming", "coding", "rust", "python", "javascript", "robotics", "electronics", "arduino", "raspberry", "3d printing", "linux"]),
    ("crafts", &["knitting", "crochet", "sewing", "woodworking", "pottery", "ceramics", "embroidery", "origami", "leather"]),
    ("games", &["chess", "board game", "video game", "gaming", "tabletop", "d&d", "dungeons", "puzzle", "poker"]),
    ("outdoor", &["hiking", "climbing", "camping", "cycling", "kayak", "fishing", "gardening", "birding", "surfing", "skiing"]),
    ("food", &["cooking", "baking", "brewing", "fermentation", "barbecue", "coffee", "wine", "tea"]),
    ("fitness", &["running", "yoga", "gym", "lifting", "swimming", "pilates", "boxing", "martial", "dance", "crossfit"]),
];

/// Collaboration keywords that signal a concrete shared project
pub const COLLAB_STRONG_KEYWORDS: &[&str] = &[
    "open source", "startup", "band", "hackathon", "jam session", "co-founder", "cofounder",
    "podcast", "game jam", "exhibition", "research", "workshop",
];

/// Complementary collaboration families: (one side, the other side)
pub const COLLAB_COMPLEMENTARY_PAIRS: &[(&[&str], &[&str])] = &[
    (&["teach", "mentor", "tutor", "coach"], &["learn", "student", "mentee", "beginner"]),
    (&["design", "artist", "illustrat"], &["develop", "engineer", "programm", "coder"]),
    (&["write", "writer", "lyric"], &["compose", "producer", "musician"]),
    (&["investor", "fund"], &["founder", "entrepreneur"]),
];

/// Broad collaboration categories
pub const COLLAB_CATEGORIES: &[(&str, &[&str])] = &[
    ("creative", &["art", "music", "write", "writing", "design", "film", "photo", "creative"]),
    ("technical", &["code", "coding", "software", "hardware", "engineer", "app", "web", "data"]),
    ("social", &["meetup", "community", "volunteer", "friends", "club", "event"]),
    ("educational", &["teach", "learn", "study", "course", "class", "tutor", "language"]),
    ("gaming", &["game", "gaming", "esports", "stream", "tabletop", "campaign"]),
];

/// Cuisine buckets for the food dimension
pub const CUISINE_BUCKETS: &[(&str, &[&str])] = &[
    ("east_asian", &["sushi", "ramen", "japanese", "chinese", "korean", "dim sum", "pho", "vietnamese", "thai"]),
    ("south_asian", &["indian", "curry", "biryani", "pakistani", "nepalese", "sri lankan"]),
    ("mediterranean", &["italian", "pizza", "pasta", "greek", "spanish", "tapas", "turkish", "lebanese"]),
    ("latin", &["mexican", "tacos", "burrito", "peruvian", "brazilian", "argentinian"]),
    ("comfort", &["burger", "bbq", "barbecue", "fried chicken", "steak", "sandwich"]),
    ("plant_based", &["vegan", "vegetarian", "salad", "falafel", "tofu"]),
];

/// Genre buckets for the music dimension
pub const GENRE_BUCKETS: &[(&str, &[&str])] = &[
    ("rock", &["rock", "punk", "metal", "grunge", "indie", "alternative"]),
    ("electronic", &["techno", "house", "edm", "electronic", "trance", "drum and bass", "ambient"]),
    ("urban", &["hip hop", "hip-hop", "rap", "r&b", "soul", "funk", "trap"]),
    ("classical", &["classical", "opera", "baroque", "orchestral", "symphony"]),
    ("jazz_blues", &["jazz", "blues", "swing", "bebop"]),
    ("pop", &["pop", "k-pop", "disco", "synthpop"]),
    ("folk", &["folk", "country", "bluegrass", "acoustic", "americana"]),
];

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default pool size if DB_MAX_CONNECTIONS is not set
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Header carrying the caller id set by the upstream auth layer
pub const CALLER_ID_HEADER: &str = "x-user-id";
