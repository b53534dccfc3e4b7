//! The platform algorithm roster, A1 through A30.
//!
//! Every agent is a data-only declaration interpreted by the one generic
//! engine in the parent module. Adding an algorithm to the platform means
//! adding a declaration here, not a new type.

use crate::agent::{AgentSpec, AlgorithmType};
use crate::value::ParameterSpec;

/// Full declaration table in roster order. Ids are the stable external
/// lookup keys.
pub fn specs() -> Vec<AgentSpec> {
    vec![
        memories_feed(),
        friend_recommendations(),
        event_rankings(),
        search_relevance(),
        notification_priority(),
        content_moderation(),
        housing_match(),
        sentiment_analysis(),
        topic_extraction(),
        user_clustering(),
        churn_prediction(),
        spam_detection(),
        image_recognition(),
        translation_quality(),
        voice_commands(),
        cache_strategy(),
        query_optimization(),
        load_balancing(),
        resource_allocation(),
        rate_limiting(),
        cdn_routing(),
        background_jobs(),
        fraud_detection(),
        access_control(),
        data_encryption(),
        audit_scoring(),
        map_route_planning(),
        calendar_scheduling(),
        payment_processing(),
        analytics_aggregation(),
    ]
}

fn memories_feed() -> AgentSpec {
    AgentSpec::new("A1", "Memories Feed", AlgorithmType::Ranking, 92)
        .description("Ranks memories and posts for the personalised home feed")
        .source("services/feed/memories_ranker.rs")
        .explain(
            "The memories feed scores each candidate post by engagement and recency. \
             Recency decays at {decay_rate} per day, friend-authored posts are weighted \
             {friend_weight}x, and posts below a score of {score_threshold} are dropped. \
             New-account boosting is currently {boost_new_users}.",
        )
        .param(ParameterSpec::number(
            "decay_rate",
            0.1,
            0.0,
            1.0,
            "Daily decay applied to a post's recency score",
            "Higher values favour fresh content over evergreen posts",
        ))
        .param(ParameterSpec::number(
            "friend_weight",
            2.0,
            1.0,
            5.0,
            "Multiplier for posts authored by direct friends",
            "Drives how social the feed feels versus interest-driven",
        ))
        .param(ParameterSpec::number(
            "score_threshold",
            0.3,
            0.0,
            0.9,
            "Minimum composite score for a post to enter the feed",
            "Raising it shortens the feed and hides marginal posts",
        ))
        .param(ParameterSpec::flag(
            "boost_new_users",
            true,
            "Give posts from accounts younger than 30 days extra reach",
            "Affects cold-start exposure for newcomers",
        ))
}

fn friend_recommendations() -> AgentSpec {
    AgentSpec::new("A2", "Friend Recommendations", AlgorithmType::Recommendation, 85)
        .description("Suggests people to connect with")
        .source("services/social/friend_suggester.rs")
        .explain(
            "Friend suggestions blend mutual-connection count with shared-interest \
             overlap using the {strategy} strategy. Mutual connections are weighted \
             {mutual_weight} and at most {max_suggestions} suggestions are shown.",
        )
        .param(ParameterSpec::choice(
            "strategy",
            "hybrid",
            &["hybrid", "mutuals_only", "interests_only"],
            "Signal blend used to build the candidate pool",
            "Changes which kind of people surface first",
        ))
        .param(ParameterSpec::number(
            "mutual_weight",
            0.6,
            0.0,
            1.0,
            "Relative weight of mutual connections in the blend",
            "High values recreate existing social circles",
        ))
        .param(ParameterSpec::number(
            "max_suggestions",
            10.0,
            1.0,
            50.0,
            "Maximum suggestions rendered per page",
            "Longer lists dilute suggestion quality",
        ))
}

fn event_rankings() -> AgentSpec {
    AgentSpec::new("A3", "Event Rankings", AlgorithmType::Ranking, 80)
        .description("Orders upcoming events for discovery pages")
        .source("services/events/event_ranker.rs")
        .explain(
            "Events are ordered by distance, date proximity and attendance momentum. \
             Distance is weighted {distance_weight}, events further than {max_distance_km} km \
             are excluded, and attendance momentum is weighted {momentum_weight}.",
        )
        .param(ParameterSpec::number(
            "distance_weight",
            0.4,
            0.0,
            1.0,
            "Weight of geographic distance in the ranking blend",
            "Higher values keep discovery local",
        ))
        .param(ParameterSpec::number(
            "max_distance_km",
            100.0,
            5.0,
            500.0,
            "Hard exclusion radius for event candidates",
            "Directly bounds how far afield events can appear",
        ))
        .param(ParameterSpec::number(
            "momentum_weight",
            0.3,
            0.0,
            1.0,
            "Weight of recent RSVP velocity",
            "Amplifies already-popular events when raised",
        ))
}

fn search_relevance() -> AgentSpec {
    AgentSpec::new("A4", "Search Relevance", AlgorithmType::Ranking, 88)
        .description("Scores search results across people, posts and events")
        .source("services/search/relevance.rs")
        .explain(
            "Search blends lexical match with popularity. Exact-match terms are \
             boosted {exact_match_boost}x, popularity contributes {popularity_weight}, \
             and fuzzy matching is {fuzzy_enabled} with an edit-distance cap of \
             {max_edit_distance}.",
        )
        .param(ParameterSpec::number(
            "exact_match_boost",
            3.0,
            1.0,
            10.0,
            "Multiplier for exact token matches",
            "Low values let popular-but-loose results outrank exact hits",
        ))
        .param(ParameterSpec::number(
            "popularity_weight",
            0.25,
            0.0,
            1.0,
            "Contribution of document popularity to the final score",
            "Raising it favours well-known accounts and posts",
        ))
        .param(ParameterSpec::flag(
            "fuzzy_enabled",
            true,
            "Allow approximate token matching",
            "Disabling it makes search strict but typo-sensitive",
        ))
        .param(ParameterSpec::number(
            "max_edit_distance",
            2.0,
            1.0,
            3.0,
            "Maximum edit distance considered a fuzzy match",
            "Wider distances increase recall and noise together",
        ))
}

fn notification_priority() -> AgentSpec {
    AgentSpec::new("A5", "Notification Priority", AlgorithmType::Scoring, 75)
        .description("Decides which notifications are pushed immediately")
        .source("services/notify/priority.rs")
        .explain(
            "Each notification gets an urgency score; scores above {push_threshold} \
             are pushed immediately, the rest are batched every {batch_interval_mins} \
             minutes. Direct mentions are weighted {mention_weight}.",
        )
        .param(ParameterSpec::number(
            "push_threshold",
            0.7,
            0.1,
            1.0,
            "Urgency score above which a notification pushes immediately",
            "Lowering it makes the app noisier",
        ))
        .param(ParameterSpec::number(
            "batch_interval_mins",
            30.0,
            5.0,
            240.0,
            "Delivery interval for batched notifications",
            "Longer intervals trade immediacy for calm",
        ))
        .param(ParameterSpec::number(
            "mention_weight",
            0.9,
            0.0,
            1.0,
            "Urgency weight of a direct mention",
            "Mentions effectively always push when this is high",
        ))
}

fn content_moderation() -> AgentSpec {
    AgentSpec::new("A6", "Content Moderation", AlgorithmType::Scoring, 95)
        .description("Flags and queues content for moderator review")
        .source("services/trust/moderation.rs")
        .explain(
            "Content scoring combines toxicity and report velocity. Items above \
             {auto_flag_threshold} are auto-flagged, items above {auto_remove_threshold} \
             are removed pending review, and the enforcement posture is {posture}.",
        )
        .param(ParameterSpec::number(
            "auto_flag_threshold",
            0.6,
            0.3,
            0.95,
            "Toxicity score that queues content for review",
            "Lower thresholds grow the moderator queue",
        ))
        .param(ParameterSpec::number(
            "auto_remove_threshold",
            0.9,
            0.5,
            1.0,
            "Toxicity score that hides content immediately",
            "False positives here directly suppress legitimate speech",
        ))
        .param(ParameterSpec::choice(
            "posture",
            "balanced",
            &["lenient", "balanced", "strict"],
            "Overall enforcement posture applied to borderline items",
            "Shifts every borderline decision at once",
        ))
}

fn housing_match() -> AgentSpec {
    AgentSpec::new("A7", "Housing Match", AlgorithmType::Recommendation, 70)
        .description("Matches travellers with host listings")
        .source("services/housing/matcher.rs")
        .explain(
            "Listings are matched on dates, budget and host reputation. Budget fit is \
             weighted {budget_weight}, host reputation {reputation_weight}, and matches \
             below {min_match_score} are suppressed.",
        )
        .param(ParameterSpec::number(
            "budget_weight",
            0.35,
            0.0,
            1.0,
            "Weight of budget compatibility",
            "High values hide great listings slightly over budget",
        ))
        .param(ParameterSpec::number(
            "reputation_weight",
            0.4,
            0.0,
            1.0,
            "Weight of host review history",
            "Protects guests but entrenches established hosts",
        ))
        .param(ParameterSpec::number(
            "min_match_score",
            0.5,
            0.0,
            0.9,
            "Floor below which a candidate listing is not shown",
            "Raising it can empty results in sparse cities",
        ))
}

fn sentiment_analysis() -> AgentSpec {
    AgentSpec::new("A8", "Sentiment Analysis", AlgorithmType::Prediction, 60)
        .description("Classifies post and comment sentiment for downstream features")
        .source("services/nlp/sentiment.rs")
        .explain(
            "Sentiment classification runs in {mode} mode with a neutral band of \
             {neutral_band} around zero; texts shorter than {min_tokens} tokens are \
             left unclassified.",
        )
        .param(ParameterSpec::choice(
            "mode",
            "balanced",
            &["fast", "balanced", "thorough"],
            "Latency/quality trade-off preset",
            "Thorough mode roughly doubles classification cost",
        ))
        .param(ParameterSpec::number(
            "neutral_band",
            0.2,
            0.0,
            0.5,
            "Half-width of the score band treated as neutral",
            "Wider bands reduce false polarity at the cost of coverage",
        ))
        .param(ParameterSpec::number(
            "min_tokens",
            3.0,
            1.0,
            20.0,
            "Minimum token count for classification",
            "Very short texts classify unreliably",
        ))
}

fn topic_extraction() -> AgentSpec {
    AgentSpec::new("A9", "Topic Extraction", AlgorithmType::Prediction, 55)
        .description("Tags content with topics for discovery and interest graphs")
        .source("services/nlp/topics.rs")
        .explain(
            "Up to {max_topics} topics are attached per post when their confidence \
             exceeds {confidence_threshold}. Emerging-topic detection is \
             {detect_emerging}.",
        )
        .param(ParameterSpec::number(
            "max_topics",
            5.0,
            1.0,
            15.0,
            "Maximum topics attached to one post",
            "More topics widen discovery but blur the interest graph",
        ))
        .param(ParameterSpec::number(
            "confidence_threshold",
            0.55,
            0.1,
            0.95,
            "Minimum model confidence to attach a topic",
            "Low values pollute topic pages with weak matches",
        ))
        .param(ParameterSpec::flag(
            "detect_emerging",
            true,
            "Track terms not yet in the topic vocabulary",
            "Needed for trend surfacing; adds processing cost",
        ))
}

fn user_clustering() -> AgentSpec {
    AgentSpec::new("A10", "User Clustering", AlgorithmType::Prediction, 65)
        .description("Groups users into behavioural cohorts for personalisation")
        .source("services/ml/clustering.rs")
        .explain(
            "Users are grouped into {cluster_count} behavioural cohorts, refreshed \
             every {refresh_hours} hours; accounts need {min_activity_events} recent \
             events before they are assigned.",
        )
        .param(ParameterSpec::number(
            "cluster_count",
            12.0,
            2.0,
            50.0,
            "Number of behavioural cohorts maintained",
            "Few large cohorts generalise; many small ones overfit",
        ))
        .param(ParameterSpec::number(
            "refresh_hours",
            24.0,
            1.0,
            168.0,
            "Recomputation interval for cohort assignment",
            "Stale cohorts lag behind behaviour shifts",
        ))
        .param(ParameterSpec::number(
            "min_activity_events",
            20.0,
            1.0,
            200.0,
            "Events required before an account is clustered",
            "Low thresholds assign noisy cohorts to new accounts",
        ))
}

fn churn_prediction() -> AgentSpec {
    AgentSpec::new("A11", "Churn Prediction", AlgorithmType::Prediction, 72)
        .description("Estimates the risk that a user goes inactive")
        .source("services/ml/churn.rs")
        .explain(
            "Churn risk looks at the last {window_days} days of activity; users above \
             {risk_threshold} are eligible for win-back campaigns, capped at \
             {max_campaigns_per_week} campaigns per week.",
        )
        .param(ParameterSpec::number(
            "window_days",
            30.0,
            7.0,
            120.0,
            "Activity window the risk model considers",
            "Short windows overreact to holidays",
        ))
        .param(ParameterSpec::number(
            "risk_threshold",
            0.65,
            0.3,
            0.95,
            "Risk score that triggers win-back eligibility",
            "Lower values spend campaign budget on safe users",
        ))
        .param(ParameterSpec::number(
            "max_campaigns_per_week",
            2.0,
            0.0,
            7.0,
            "Ceiling on win-back messages per user per week",
            "Over-messaging accelerates the churn it fights",
        ))
}

fn spam_detection() -> AgentSpec {
    AgentSpec::new("A12", "Spam Detection", AlgorithmType::Scoring, 90)
        .description("Scores content and accounts for spam behaviour")
        .source("services/trust/spam.rs")
        .explain(
            "Spam scoring throttles accounts above {throttle_threshold} and blocks \
             above {block_threshold}. Link-heavy posts are penalised {link_penalty} \
             per link and duplicate detection is {duplicate_check}.",
        )
        .param(ParameterSpec::number(
            "throttle_threshold",
            0.6,
            0.2,
            0.95,
            "Spam score that rate-limits an account",
            "Throttling is invisible; misfires quietly mute users",
        ))
        .param(ParameterSpec::number(
            "block_threshold",
            0.9,
            0.5,
            1.0,
            "Spam score that blocks posting outright",
            "The heaviest hammer this agent can swing",
        ))
        .param(ParameterSpec::number(
            "link_penalty",
            0.15,
            0.0,
            0.5,
            "Score penalty per external link in a post",
            "Punishes link spam and link-heavy newsletters alike",
        ))
        .param(ParameterSpec::flag(
            "duplicate_check",
            true,
            "Penalise near-duplicate reposts",
            "Core defence against copy-paste spam waves",
        ))
}

fn image_recognition() -> AgentSpec {
    AgentSpec::new("A13", "Image Recognition", AlgorithmType::Prediction, 58)
        .description("Labels uploaded images for search and safety")
        .source("services/vision/labeler.rs")
        .explain(
            "Images get up to {max_labels} labels above {label_confidence} confidence; \
             unsafe-content screening runs in {safety_mode} mode.",
        )
        .param(ParameterSpec::number(
            "max_labels",
            8.0,
            1.0,
            25.0,
            "Maximum labels stored per image",
            "More labels improve recall in image search",
        ))
        .param(ParameterSpec::number(
            "label_confidence",
            0.6,
            0.2,
            0.95,
            "Minimum confidence to store a label",
            "Low values attach absurd labels that surface in search",
        ))
        .param(ParameterSpec::choice(
            "safety_mode",
            "standard",
            &["off", "standard", "strict"],
            "Unsafe-content screening level",
            "Strict mode increases false positives on art and medical images",
        ))
}

fn translation_quality() -> AgentSpec {
    AgentSpec::new("A14", "Translation Quality", AlgorithmType::Scoring, 62)
        .description("Gates machine translations shown across locales")
        .source("services/i18n/quality_gate.rs")
        .explain(
            "Machine translations are shown only above {display_threshold} estimated \
             quality; below {fallback_threshold} the original text is shown instead. \
             Community corrections are {community_edits}.",
        )
        .param(ParameterSpec::number(
            "display_threshold",
            0.7,
            0.3,
            0.95,
            "Estimated quality needed to show a translation",
            "Users see more untranslated text when raised",
        ))
        .param(ParameterSpec::number(
            "fallback_threshold",
            0.4,
            0.1,
            0.7,
            "Quality floor below which the source text is preferred",
            "Prevents garbled translations from reaching readers",
        ))
        .param(ParameterSpec::flag(
            "community_edits",
            true,
            "Accept community-suggested corrections",
            "Improves long-tail languages; needs moderation capacity",
        ))
}

fn voice_commands() -> AgentSpec {
    AgentSpec::new("A15", "Voice Commands", AlgorithmType::Prediction, 45)
        .description("Interprets voice input on mobile clients")
        .source("services/voice/interpreter.rs")
        .explain(
            "Voice commands execute when intent confidence exceeds \
             {intent_confidence}; otherwise the app asks for confirmation. \
             Recognition waits {silence_timeout_ms} ms of silence before closing.",
        )
        .param(ParameterSpec::number(
            "intent_confidence",
            0.75,
            0.4,
            0.99,
            "Confidence needed to execute without confirmation",
            "Low values execute wrong commands; high ones nag",
        ))
        .param(ParameterSpec::number(
            "silence_timeout_ms",
            900.0,
            300.0,
            3000.0,
            "Trailing silence that ends a capture",
            "Short timeouts cut off slow speakers",
        ))
}

fn cache_strategy() -> AgentSpec {
    AgentSpec::new("A16", "Cache Strategy", AlgorithmType::Optimization, 68)
        .description("Tunes application-level cache behaviour")
        .source("infra/cache/policy.rs")
        .explain(
            "Caches use the {eviction_policy} policy with a default TTL of \
             {default_ttl_secs} seconds; entries hotter than {hot_key_rps} requests \
             per second are pinned.",
        )
        .param(ParameterSpec::choice(
            "eviction_policy",
            "lru",
            &["lru", "lfu", "fifo"],
            "Eviction policy for the main object cache",
            "Changes which workloads stay warm under pressure",
        ))
        .param(ParameterSpec::number(
            "default_ttl_secs",
            300.0,
            10.0,
            86400.0,
            "Default entry time-to-live",
            "Long TTLs serve stale profile data after edits",
        ))
        .param(ParameterSpec::number(
            "hot_key_rps",
            50.0,
            1.0,
            1000.0,
            "Request rate that pins an entry",
            "Protects celebrity profiles during traffic spikes",
        ))
}

fn query_optimization() -> AgentSpec {
    AgentSpec::new("A17", "Query Optimization", AlgorithmType::Optimization, 78)
        .description("Controls adaptive query planning heuristics")
        .source("infra/db/query_planner.rs")
        .explain(
            "Queries estimated over {slow_query_ms} ms are rewritten when possible; \
             the planner explores {plan_candidates} candidate plans and index hints \
             are {index_hints}.",
        )
        .param(ParameterSpec::number(
            "slow_query_ms",
            250.0,
            50.0,
            5000.0,
            "Estimated cost that triggers plan rewriting",
            "Aggressive rewriting risks regressions on fast queries",
        ))
        .param(ParameterSpec::number(
            "plan_candidates",
            4.0,
            1.0,
            16.0,
            "Candidate plans considered per rewrite",
            "More candidates cost planner CPU per query",
        ))
        .param(ParameterSpec::flag(
            "index_hints",
            false,
            "Apply automatic index hints to rewritten queries",
            "Can pin bad indexes after data distribution shifts",
        ))
}

fn load_balancing() -> AgentSpec {
    AgentSpec::new("A18", "Load Balancing", AlgorithmType::Optimization, 82)
        .description("Distributes traffic across application servers")
        .source("infra/net/balancer.rs")
        .explain(
            "Traffic is distributed with the {algorithm} algorithm; a node is drained \
             above {drain_cpu_pct} percent CPU and sticky sessions are {sticky_sessions}.",
        )
        .param(ParameterSpec::choice(
            "algorithm",
            "least_connections",
            &["round_robin", "least_connections", "weighted"],
            "Balancing algorithm for app-tier traffic",
            "Interacts with long-lived websocket connections",
        ))
        .param(ParameterSpec::number(
            "drain_cpu_pct",
            85.0,
            50.0,
            99.0,
            "CPU percentage at which a node is drained",
            "Draining too early wastes capacity headroom",
        ))
        .param(ParameterSpec::flag(
            "sticky_sessions",
            true,
            "Route a session to the same node when possible",
            "Required for in-memory presence; hurts balance",
        ))
}

fn resource_allocation() -> AgentSpec {
    AgentSpec::new("A19", "Resource Allocation", AlgorithmType::Optimization, 74)
        .description("Scales worker pools for background workloads")
        .source("infra/workers/autoscaler.rs")
        .explain(
            "Worker pools scale between {min_workers} and {max_workers} instances, \
             adding capacity when queue depth per worker exceeds {scale_up_depth}.",
        )
        .param(ParameterSpec::number(
            "min_workers",
            2.0,
            1.0,
            50.0,
            "Floor of the worker pool",
            "Too low causes cold-start latency after quiet periods",
        ))
        .param(ParameterSpec::number(
            "max_workers",
            32.0,
            1.0,
            500.0,
            "Ceiling of the worker pool",
            "The direct cost lever for background processing",
        ))
        .param(ParameterSpec::number(
            "scale_up_depth",
            100.0,
            10.0,
            10000.0,
            "Queue depth per worker that adds capacity",
            "Low values scale eagerly and expensively",
        ))
}

fn rate_limiting() -> AgentSpec {
    AgentSpec::new("A20", "Rate Limiting", AlgorithmType::Optimization, 86)
        .description("Protects the API with per-client request budgets")
        .source("infra/net/rate_limiter.rs")
        .explain(
            "Authenticated clients get {requests_per_minute} requests per minute with \
             bursts of {burst_size}; anonymous traffic is scaled down by \
             {anonymous_factor}.",
        )
        .param(ParameterSpec::number(
            "requests_per_minute",
            600.0,
            60.0,
            10000.0,
            "Sustained request budget per authenticated client",
            "Third-party integrations break first when lowered",
        ))
        .param(ParameterSpec::number(
            "burst_size",
            100.0,
            10.0,
            2000.0,
            "Instantaneous burst allowance",
            "Small bursts penalise page loads that fan out",
        ))
        .param(ParameterSpec::number(
            "anonymous_factor",
            0.2,
            0.01,
            1.0,
            "Fraction of the budget granted to anonymous clients",
            "The main scraping defence",
        ))
}

fn cdn_routing() -> AgentSpec {
    AgentSpec::new("A21", "CDN Routing", AlgorithmType::Optimization, 66)
        .description("Chooses edge locations for media delivery")
        .source("infra/cdn/router.rs")
        .explain(
            "Media requests route to the nearest healthy edge; an edge is unhealthy \
             above {max_edge_latency_ms} ms median latency and {failover_strategy} \
             failover is used.",
        )
        .param(ParameterSpec::number(
            "max_edge_latency_ms",
            120.0,
            20.0,
            1000.0,
            "Median latency that marks an edge unhealthy",
            "Tight bounds cause route flapping between regions",
        ))
        .param(ParameterSpec::choice(
            "failover_strategy",
            "nearest_healthy",
            &["nearest_healthy", "origin_direct", "round_robin"],
            "Where traffic goes when the preferred edge is down",
            "Origin-direct failover can overload the origin",
        ))
}

fn background_jobs() -> AgentSpec {
    AgentSpec::new("A22", "Background Jobs", AlgorithmType::Optimization, 64)
        .description("Schedules deferred work across the job queue")
        .source("infra/workers/scheduler.rs")
        .explain(
            "Jobs retry up to {max_retries} times with a base backoff of \
             {backoff_base_secs} seconds; jobs older than {stale_after_hours} hours \
             are dropped to the dead-letter queue.",
        )
        .param(ParameterSpec::number(
            "max_retries",
            5.0,
            0.0,
            20.0,
            "Retry attempts before a job is dead-lettered",
            "High values hide persistent failures from operators",
        ))
        .param(ParameterSpec::number(
            "backoff_base_secs",
            30.0,
            1.0,
            3600.0,
            "Base of the exponential retry backoff",
            "Short backoffs hammer failing dependencies",
        ))
        .param(ParameterSpec::number(
            "stale_after_hours",
            24.0,
            1.0,
            168.0,
            "Age at which a queued job is abandoned",
            "Notification jobs are worthless long before this",
        ))
}

fn fraud_detection() -> AgentSpec {
    AgentSpec::new("A23", "Fraud Detection", AlgorithmType::Prediction, 96)
        .description("Scores payments and account actions for fraud risk")
        .source("services/trust/fraud.rs")
        .explain(
            "Transactions above {review_threshold} risk go to manual review and above \
             {decline_threshold} are declined outright. Velocity checks look at the \
             last {velocity_window_mins} minutes and device fingerprinting is \
             {device_fingerprint}.",
        )
        .param(ParameterSpec::number(
            "review_threshold",
            0.5,
            0.2,
            0.9,
            "Risk score that routes a transaction to manual review",
            "Review capacity bounds how low this can go",
        ))
        .param(ParameterSpec::number(
            "decline_threshold",
            0.85,
            0.5,
            1.0,
            "Risk score that declines a transaction",
            "False declines directly cost revenue and trust",
        ))
        .param(ParameterSpec::number(
            "velocity_window_mins",
            60.0,
            5.0,
            1440.0,
            "Window for transaction-velocity features",
            "Narrow windows miss slow card-testing attacks",
        ))
        .param(ParameterSpec::flag(
            "device_fingerprint",
            true,
            "Use device fingerprints as a risk signal",
            "The strongest repeat-offender signal available",
        ))
}

fn access_control() -> AgentSpec {
    AgentSpec::new("A24", "Access Control", AlgorithmType::Scoring, 94)
        .description("Scores login and session risk for step-up authentication")
        .source("services/auth/risk.rs")
        .explain(
            "Sign-ins above {stepup_threshold} risk require a second factor; sessions \
             idle for {session_idle_mins} minutes re-authenticate. New-device alerts \
             are {new_device_alerts}.",
        )
        .param(ParameterSpec::number(
            "stepup_threshold",
            0.6,
            0.2,
            0.95,
            "Risk score that forces step-up authentication",
            "Every basis point here is login friction",
        ))
        .param(ParameterSpec::number(
            "session_idle_mins",
            43200.0,
            30.0,
            129600.0,
            "Idle time before a session must re-authenticate",
            "Short values log users out mid-week",
        ))
        .param(ParameterSpec::flag(
            "new_device_alerts",
            true,
            "Notify account owners of first-seen devices",
            "Primary account-takeover tripwire",
        ))
}

fn data_encryption() -> AgentSpec {
    AgentSpec::new("A25", "Data Encryption", AlgorithmType::Optimization, 76)
        .description("Manages at-rest encryption and key rotation cadence")
        .source("infra/security/key_manager.rs")
        .explain(
            "Data keys rotate every {rotation_days} days with {batch_size} records \
             re-encrypted per batch; envelope encryption is {envelope_mode}.",
        )
        .param(ParameterSpec::number(
            "rotation_days",
            90.0,
            7.0,
            365.0,
            "Key rotation interval",
            "Compliance floors constrain the upper end",
        ))
        .param(ParameterSpec::number(
            "batch_size",
            5000.0,
            100.0,
            100000.0,
            "Records re-encrypted per rotation batch",
            "Large batches contend with production writes",
        ))
        .param(ParameterSpec::flag(
            "envelope_mode",
            true,
            "Wrap data keys with the master key service",
            "Disabling is only valid in development environments",
        ))
}

fn audit_scoring() -> AgentSpec {
    AgentSpec::new("A26", "Audit Scoring", AlgorithmType::Scoring, 71)
        .description("Prioritises internal audit findings for follow-up")
        .source("services/compliance/audit_scorer.rs")
        .explain(
            "Findings are scored by severity and age; severity is weighted \
             {severity_weight}, findings gain {age_escalation} per week open, and \
             scores above {escalate_threshold} page the on-call owner.",
        )
        .param(ParameterSpec::number(
            "severity_weight",
            0.7,
            0.0,
            1.0,
            "Weight of declared severity in the priority score",
            "Counterweight to pure age-based escalation",
        ))
        .param(ParameterSpec::number(
            "age_escalation",
            0.05,
            0.0,
            0.5,
            "Score added per week a finding stays open",
            "Stops low-severity findings from rotting forever",
        ))
        .param(ParameterSpec::number(
            "escalate_threshold",
            0.8,
            0.3,
            1.0,
            "Score that pages the owning team",
            "Paging fatigue follows directly from this knob",
        ))
}

fn map_route_planning() -> AgentSpec {
    AgentSpec::new("A27", "Map Route Planning", AlgorithmType::Optimization, 59)
        .description("Plans walking and transit routes between venues")
        .source("services/maps/router.rs")
        .explain(
            "Routes are optimised for {optimize_for} with walking segments capped at \
             {max_walk_km} km; live transit delays are {use_live_delays}.",
        )
        .param(ParameterSpec::choice(
            "optimize_for",
            "duration",
            &["duration", "transfers", "scenic"],
            "Primary objective of route scoring",
            "Scenic routing trades minutes for waterfront streets",
        ))
        .param(ParameterSpec::number(
            "max_walk_km",
            1.5,
            0.2,
            10.0,
            "Longest walking segment a route may include",
            "Accessibility depends on this staying conservative",
        ))
        .param(ParameterSpec::flag(
            "use_live_delays",
            true,
            "Fold live transit delay feeds into planning",
            "Without it, routes are optimistic during disruptions",
        ))
}

fn calendar_scheduling() -> AgentSpec {
    AgentSpec::new("A28", "Calendar Scheduling", AlgorithmType::Optimization, 52)
        .description("Proposes meeting slots for group events")
        .source("services/events/slot_finder.rs")
        .explain(
            "Slot search proposes {proposals} options within the next \
             {horizon_days} days, requiring {min_attendance_pct} percent of invitees \
             to be free.",
        )
        .param(ParameterSpec::number(
            "proposals",
            3.0,
            1.0,
            10.0,
            "Slot options proposed per request",
            "Choice overload sets in quickly past a handful",
        ))
        .param(ParameterSpec::number(
            "horizon_days",
            14.0,
            1.0,
            90.0,
            "How far ahead slots are searched",
            "Long horizons propose slots people won't honour",
        ))
        .param(ParameterSpec::number(
            "min_attendance_pct",
            60.0,
            10.0,
            100.0,
            "Invitee availability required for a proposal",
            "The quorum/latency trade-off for group events",
        ))
}

fn payment_processing() -> AgentSpec {
    AgentSpec::new("A29", "Payment Processing", AlgorithmType::Scoring, 93)
        .description("Routes payments across providers and retries failures")
        .source("services/payments/router.rs")
        .explain(
            "Payments route by {routing_mode}; soft declines retry {retry_attempts} \
             times spaced {retry_spacing_secs} seconds apart.",
        )
        .param(ParameterSpec::choice(
            "routing_mode",
            "cost_optimised",
            &["cost_optimised", "success_optimised", "primary_only"],
            "Provider selection objective",
            "Success-optimised routing costs basis points per charge",
        ))
        .param(ParameterSpec::number(
            "retry_attempts",
            2.0,
            0.0,
            5.0,
            "Automatic retries after a soft decline",
            "Issuers flag aggressive retry behaviour",
        ))
        .param(ParameterSpec::number(
            "retry_spacing_secs",
            3600.0,
            60.0,
            86400.0,
            "Delay between payment retries",
            "Too-fast retries hit the same issuer posture",
        ))
}

fn analytics_aggregation() -> AgentSpec {
    AgentSpec::new("A30", "Analytics Aggregation", AlgorithmType::Optimization, 61)
        .description("Rolls up event streams into reporting tables")
        .source("infra/analytics/rollup.rs")
        .explain(
            "Event rollups run every {rollup_interval_mins} minutes at \
             {granularity} granularity; late events within {late_window_mins} minutes \
             are merged into their original bucket.",
        )
        .param(ParameterSpec::number(
            "rollup_interval_mins",
            15.0,
            1.0,
            1440.0,
            "How often rollups materialise",
            "Dashboards lag by at most this interval",
        ))
        .param(ParameterSpec::choice(
            "granularity",
            "hourly",
            &["minute", "hourly", "daily"],
            "Bucket size of the primary rollup tables",
            "Finer granularity multiplies storage directly",
        ))
        .param(ParameterSpec::number(
            "late_window_mins",
            120.0,
            0.0,
            1440.0,
            "Grace window for late-arriving events",
            "Beyond it, late events are counted in a correction bucket",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Parameter;
    use std::collections::HashSet;

    #[test]
    fn roster_has_thirty_unique_ids_in_order() {
        let specs = specs();
        assert_eq!(specs.len(), 30);
        let mut seen = HashSet::new();
        for (index, spec) in specs.iter().enumerate() {
            assert_eq!(spec.id, format!("A{}", index + 1));
            assert!(seen.insert(spec.id.clone()), "duplicate id {}", spec.id);
        }
    }

    #[test]
    fn every_declaration_is_well_formed() {
        for spec in specs() {
            assert!(!spec.name.is_empty(), "{} has no name", spec.id);
            assert!(!spec.description.is_empty(), "{} has no description", spec.id);
            assert!(!spec.source_location.is_empty(), "{} has no source", spec.id);
            assert!(spec.impact_score <= 100, "{} impact out of range", spec.id);
            assert!(
                !spec.parameters.is_empty(),
                "{} declares no parameters",
                spec.id
            );

            let mut names = HashSet::new();
            for param in &spec.parameters {
                assert!(
                    names.insert(param.name.clone()),
                    "{} declares '{}' twice",
                    spec.id,
                    param.name
                );
            }
        }
    }

    #[test]
    fn defaults_satisfy_their_own_constraints() {
        for spec in specs() {
            for param_spec in &spec.parameters {
                let param = Parameter::from_spec(param_spec);
                param.check_value(&param.default_value).unwrap_or_else(|reason| {
                    panic!(
                        "{} parameter '{}' default violates its constraint: {}",
                        spec.id, param.name, reason
                    )
                });
            }
        }
    }

    #[test]
    fn explain_templates_only_reference_declared_parameters() {
        for spec in specs() {
            let mut text = spec.explain_template.clone();
            for param in &spec.parameters {
                text = text.replace(&format!("{{{}}}", param.name), "x");
            }
            assert!(
                !text.contains('{') && !text.contains('}'),
                "{} template references an undeclared parameter: {}",
                spec.id,
                text
            );
        }
    }
}
