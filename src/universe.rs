/// Merval panel tickers (Buenos Aires listings) and their shares outstanding.
///
/// `None` marks instruments without a share count, such as the index itself.
/// Counts are reference figures and are not refreshed at runtime.
pub const MERVAL_UNIVERSE: &[(&str, Option<u64>)] = &[
    ("^MERV", None),
    ("ALUA.BA", Some(2_800_000_000)),
    ("BBAR.BA", Some(612_710_079)),
    ("BMA.BA", Some(639_413_408)),
    ("BYMA.BA", Some(3_812_500_000)),
    ("CEPU.BA", Some(1_514_022_256)),
    ("COME.BA", Some(3_580_470_560)),
    ("CRES.BA", Some(605_677_323)),
    ("EDN.BA", Some(906_455_100)),
    ("GGAL.BA", Some(1_474_692_091)),
    ("LOMA.BA", Some(596_026_490)),
    ("METR.BA", Some(560_999_140)),
    ("MIRG.BA", Some(16_000_000)),
    ("PAMP.BA", Some(1_360_000_000)),
    ("SUPV.BA", Some(438_802_378)),
    ("TECO2.BA", Some(2_153_688_011)),
    ("TGNO4.BA", Some(439_373_939)),
    ("TGSU2.BA", Some(794_495_283)),
    ("TRAN.BA", Some(444_673_796)),
    ("TXAR.BA", Some(4_517_094_023)),
    ("VALO.BA", Some(785_000_000)),
    ("YPFD.BA", Some(393_312_793)),
];
