use serde::{Deserialize, Serialize};

use super::score::Score;

/// Outcome category for a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultTier {
    InfrastructureFriction,
    ProgressWithGaps,
    BuiltForScale,
    AiReadyExcellence,
}

struct TierContent {
    label: &'static str,
    category: &'static str,
    marker: &'static str,
    description: &'static str,
    recommendations: [&'static str; 3],
    benchmark: &'static str,
}

static INFRASTRUCTURE_FRICTION: TierContent = TierContent {
    label: "Infrastructure Friction",
    category: "not-ready",
    marker: "\u{1f534}",
    description: "You're in the bottom 25% of organizations for AI readiness. Key gaps: GPU bottlenecks, network latency, and security vulnerabilities are limiting your AI ROI. Priority: Establish validated architecture foundations.",
    recommendations: [
        "Start with Cisco UCS C885A + NVIDIA HGX for dedicated AI compute",
        "Implement fabric-aware networking (Nexus 9000) to eliminate bottlenecks",
        "Deploy AI-native security (Cisco AI Defense) to protect model integrity",
    ],
    benchmark: "Based on our assessment of 500+ enterprise AI initiatives, organizations with your profile typically see 40-60% improvement in AI project success rates after implementing validated architecture.",
};

static PROGRESS_WITH_GAPS: TierContent = TierContent {
    label: "Progress with Gaps",
    category: "emerging",
    marker: "\u{1f7e0}",
    description: "You're ahead of 40% of organizations but infrastructure bottlenecks are limiting scale. You have foundations but need enterprise-grade optimization to support production AI workloads.",
    recommendations: [
        "Upgrade to integrated AI fabric architecture for consistent performance",
        "Add workload observability and automated scaling capabilities",
        "Implement managed AI infrastructure to accelerate time-to-value",
    ],
    benchmark: "Organizations at your maturity level typically achieve 2-3x faster AI deployment cycles and 35% better model performance with optimized infrastructure.",
};

static BUILT_FOR_SCALE: TierContent = TierContent {
    label: "Built for Scale",
    category: "capable",
    marker: "\u{1f7e1}",
    description: "You're in the top 30% of organizations for AI infrastructure maturity. You have enterprise-grade foundations and understand the importance of validated architecture.",
    recommendations: [
        "Optimize east-west traffic patterns for multi-GPU training workloads",
        "Add comprehensive AI security posture management",
        "Consider managed services to focus internal resources on innovation",
    ],
    benchmark: "You're ahead of 70% of enterprises in AI infrastructure maturity. Companies at your level typically focus on advanced optimization and strategic AI initiatives.",
};

static AI_READY_EXCELLENCE: TierContent = TierContent {
    label: "AI-Ready Excellence",
    category: "ready",
    marker: "\u{1f7e2}",
    description: "You're in the top 10% of organizations for AI infrastructure readiness. You understand that enterprise AI requires validated architecture, security-first design, and expert lifecycle management.",
    recommendations: [
        "Focus on advanced AI workload optimization and model governance",
        "Explore edge AI deployment and hybrid cloud strategies",
        "Consider strategic partnership for next-generation AI initiatives",
    ],
    benchmark: "You're in the top 10% of enterprises for AI infrastructure readiness. Organizations at your level typically serve as industry benchmarks and case studies.",
};

impl ResultTier {
    pub const fn ordered() -> [ResultTier; 4] {
        [
            ResultTier::InfrastructureFriction,
            ResultTier::ProgressWithGaps,
            ResultTier::BuiltForScale,
            ResultTier::AiReadyExcellence,
        ]
    }

    fn content(self) -> &'static TierContent {
        match self {
            ResultTier::InfrastructureFriction => &INFRASTRUCTURE_FRICTION,
            ResultTier::ProgressWithGaps => &PROGRESS_WITH_GAPS,
            ResultTier::BuiltForScale => &BUILT_FOR_SCALE,
            ResultTier::AiReadyExcellence => &AI_READY_EXCELLENCE,
        }
    }

    pub fn label(self) -> &'static str {
        self.content().label
    }

    /// Short tag the presentation layer keys its styling on.
    pub fn category(self) -> &'static str {
        self.content().category
    }

    pub fn marker(self) -> &'static str {
        self.content().marker
    }

    pub fn description(self) -> &'static str {
        self.content().description
    }

    pub fn recommendations(self) -> &'static [&'static str; 3] {
        &self.content().recommendations
    }

    pub fn benchmark(self) -> &'static str {
        self.content().benchmark
    }

    pub fn css_class(self) -> String {
        format!("score-{}", self.category())
    }

    pub fn title(self, score: Score) -> String {
        format!("{} {} (Score: {}/5.0)", self.marker(), self.label(), score)
    }
}

struct TierBand {
    tier: ResultTier,
    lowest_tenths: i32,
    highest_tenths: i32,
}

// Checked in order, bounds inclusive. Scores outside every band fall through to the top tier.
const TIER_BANDS: [TierBand; 3] = [
    TierBand {
        tier: ResultTier::InfrastructureFriction,
        lowest_tenths: 0,
        highest_tenths: 24,
    },
    TierBand {
        tier: ResultTier::ProgressWithGaps,
        lowest_tenths: 25,
        highest_tenths: 34,
    },
    TierBand {
        tier: ResultTier::BuiltForScale,
        lowest_tenths: 35,
        highest_tenths: 42,
    },
];

const FALLBACK_TIER: ResultTier = ResultTier::AiReadyExcellence;

fn band_for(score: Score) -> ResultTier {
    TIER_BANDS
        .iter()
        .find(|band| (band.lowest_tenths..=band.highest_tenths).contains(&score.tenths()))
        .map(|band| band.tier)
        .unwrap_or(FALLBACK_TIER)
}

/// Maps any score to exactly one tier.
pub fn resolve_tier(score: Score) -> ResultTier {
    band_for(score)
}

/// Benchmark narrative for a score, drawn from the same band table as [`resolve_tier`].
pub fn resolve_benchmark_narrative(score: Score) -> &'static str {
    band_for(score).benchmark()
}

/// Display-ready result for a resolved score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierResult {
    pub tier: ResultTier,
    pub score: Score,
    pub title: String,
    pub description: &'static str,
    pub category: &'static str,
    pub css_class: String,
    pub recommendations: Vec<&'static str>,
    pub benchmark: &'static str,
}

impl TierResult {
    pub fn for_score(score: Score) -> Self {
        let tier = resolve_tier(score);
        Self {
            tier,
            score,
            title: tier.title(score),
            description: tier.description(),
            category: tier.category(),
            css_class: tier.css_class(),
            recommendations: tier.recommendations().to_vec(),
            benchmark: resolve_benchmark_narrative(score),
        }
    }
}
