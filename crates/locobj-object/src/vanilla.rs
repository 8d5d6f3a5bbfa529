//! Identifiers of the objects shipped with the original game.
//!
//! The source-game bits in a header are unreliable, so save-file packing asks
//! this table instead.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

/// `(name, type tag)` of every built-in object.
#[rustfmt::skip]
static VANILLA_OBJECTS: &[([u8; 8], u8)] = &[
    (*b"INTERDEF", 0),
    (*b"SNDA1   ", 1),
    (*b"SNDA2   ", 1),
    (*b"SNDA3   ", 1),
    (*b"SNDTD1  ", 1),
    (*b"SNDTD2  ", 1),
    (*b"SNDH4   ", 1),
    (*b"SNDH5   ", 1),
    (*b"SNDH6   ", 1),
    (*b"SNDCH1A ", 1),
    (*b"SNDCH1AS", 1),
    (*b"SNDCH1B ", 1),
    (*b"SNDCH1BS", 1),
    (*b"SNDCH1C ", 1),
    (*b"SNDCH1CS", 1),
    (*b"SNDCH1D ", 1),
    (*b"SNDCH1DS", 1),
    (*b"SNDD1   ", 1),
    (*b"SNDD10  ", 1),
    (*b"SNDD11  ", 1),
    (*b"SNDD12  ", 1),
    (*b"SNDD2   ", 1),
    (*b"SNDD3   ", 1),
    (*b"SNDD4   ", 1),
    (*b"SNDD5   ", 1),
    (*b"SNDD6   ", 1),
    (*b"SNDD7   ", 1),
    (*b"SNDD8   ", 1),
    (*b"SNDD9   ", 1),
    (*b"SNDE1   ", 1),
    (*b"SNDH1   ", 1),
    (*b"SNDH2   ", 1),
    (*b"SNDH3   ", 1),
    (*b"SNDW1   ", 1),
    (*b"SNDW2   ", 1),
    (*b"SNDW3   ", 1),
    (*b"SNDW4   ", 1),
    (*b"SNDW5   ", 1),
    (*b"SNDW6   ", 1),
    (*b"SNDW7   ", 1),
    (*b"SNDW8   ", 1),
    (*b"SNDS1   ", 1),
    (*b"SNDTR1  ", 1),
    (*b"CURRDMRK", 2),
    (*b"CURRDOLL", 2),
    (*b"CURREURO", 2),
    (*b"CURRFREN", 2),
    (*b"CURRGUIL", 2),
    (*b"CURRKRON", 2),
    (*b"CURRLIRA", 2),
    (*b"CURRPSTA", 2),
    (*b"CURRPNDS", 2),
    (*b"CURRNTDL", 2),
    (*b"CURRWON ", 2),
    (*b"CURRYEN ", 2),
    (*b"CURRZLOT", 2),
    (*b"EXH1    ", 3),
    (*b"EXH2    ", 3),
    (*b"SPARK1  ", 3),
    (*b"WWAKE1  ", 3),
    (*b"STEAM   ", 3),
    (*b"LSBROWN ", 4),
    (*b"LSROCK  ", 4),
    (*b"WATER1  ", 5),
    (*b"ROCK2   ", 6),
    (*b"GRASSBR ", 6),
    (*b"GRASS1  ", 6),
    (*b"ROCK1   ", 6),
    (*b"SAND1   ", 6),
    (*b"ETOWNNAM", 7),
    (*b"FTOWNNAM", 7),
    (*b"GTOWNNAM", 7),
    (*b"LTOWNNAM", 7),
    (*b"ATOWNNAM", 7),
    (*b"STOWNNAM", 7),
    (*b"CHEMICAL", 8),
    (*b"COAL    ", 8),
    (*b"FOOD    ", 8),
    (*b"GOODS   ", 8),
    (*b"GRAIN   ", 8),
    (*b"GRAPES  ", 8),
    (*b"IRONORE ", 8),
    (*b"LIVESTCK", 8),
    (*b"TIMBER  ", 8),
    (*b"MAIL    ", 8),
    (*b"OIL     ", 8),
    (*b"PAPER   ", 8),
    (*b"PASS    ", 8),
    (*b"STEEL   ", 8),
    (*b"FENCE1  ", 9),
    (*b"FENCE1G ", 9),
    (*b"SECFENCE", 9),
    (*b"SECFENCG", 9),
    (*b"STONWALG", 9),
    (*b"STONWALL", 9),
    (*b"BRWNWALG", 9),
    (*b"BRWNWALL", 9),
    (*b"SIGC3   ", 10),
    (*b"SIGCSW  ", 10),
    (*b"SIGCUS  ", 10),
    (*b"SIGC4   ", 10),
    (*b"SIGSUS  ", 10),
    (*b"SIGSW   ", 10),
    (*b"SIGSL   ", 10),
    (*b"SIGSDL  ", 10),
    (*b"SIGS    ", 10),
    (*b"SIGSD   ", 10),
    (*b"LCROSS3 ", 11),
    (*b"LCROSS1 ", 11),
    (*b"LCROSS2 ", 11),
    (*b"LCROSS4 ", 11),
    (*b"SLIGHT1 ", 12),
    (*b"TUNNEL1 ", 13),
    (*b"TUNNEL2 ", 13),
    (*b"BRDGBRCK", 14),
    (*b"BRDGSTAR", 14),
    (*b"BRDGGIRD", 14),
    (*b"BRDGSUSP", 14),
    (*b"BRDGWOOD", 14),
    (*b"TRSTAT1 ", 15),
    (*b"TRSTAT4 ", 15),
    (*b"TRSTAT5 ", 15),
    (*b"TRSTAT2 ", 15),
    (*b"TRSTAT3 ", 15),
    (*b"TREX3RL ", 16),
    (*b"TREXCAT1", 16),
    (*b"TREXRACK", 16),
    (*b"TRACKNG ", 17),
    (*b"TRACKST ", 17),
    (*b"RDSTATL1", 18),
    (*b"RDSTATL2", 18),
    (*b"RDSTATL3", 18),
    (*b"BUSSTOP ", 18),
    (*b"RDSTAT1 ", 18),
    (*b"RDSTAT2 ", 18),
    (*b"RDSTAT3 ", 18),
    (*b"RDEXCAT1", 19),
    (*b"ROADONE ", 20),
    (*b"ROADUS1 ", 20),
    (*b"ROADTMC ", 20),
    (*b"ROADUS2 ", 20),
    (*b"ROADRGH ", 20),
    (*b"ROADTRAM", 20),
    (*b"HPORT1  ", 21),
    (*b"AIRPORT4", 21),
    (*b"AIRPORT1", 21),
    (*b"HPORT2  ", 21),
    (*b"AIRPORT3", 21),
    (*b"AIRPORT2", 21),
    (*b"SHIPST1 ", 22),
    (*b"2EPB    ", 23),
    (*b"JINTY   ", 23),
    (*b"707     ", 23),
    (*b"737     ", 23),
    (*b"747     ", 23),
    (*b"777     ", 23),
    (*b"A320    ", 23),
    (*b"A380    ", 23),
    (*b"A5      ", 23),
    (*b"AB139   ", 23),
    (*b"APT1    ", 23),
    (*b"APT2    ", 23),
    (*b"APT3    ", 23),
    (*b"AE47    ", 23),
    (*b"AILSA1  ", 23),
    (*b"BA146   ", 23),
    (*b"4MT     ", 23),
    (*b"BALDWIN1", 23),
    (*b"TRAM1   ", 23),
    (*b"TRAM4   ", 23),
    (*b"GOODS2  ", 23),
    (*b"GOODS3  ", 23),
    (*b"COALSH  ", 23),
    (*b"C130    ", 23),
    (*b"CARGOSH1", 23),
    (*b"CTRUCK1 ", 23),
    (*b"CTRUCK2 ", 23),
    (*b"CTRUCK3 ", 23),
    (*b"CTRUCK4 ", 23),
    (*b"TRAM2   ", 23),
    (*b"CE68    ", 23),
    (*b"ALCOCENT", 23),
    (*b"114     ", 23),
    (*b"142     ", 23),
    (*b"158     ", 23),
    (*b"CL20    ", 23),
    (*b"CL37    ", 23),
    (*b"CL47    ", 23),
    (*b"508     ", 23),
    (*b"CL55    ", 23),
    (*b"CL58    ", 23),
    (*b"656     ", 23),
    (*b"CL67    ", 23),
    (*b"CL71    ", 23),
    (*b"CL85    ", 23),
    (*b"CL86    ", 23),
    (*b"CL90    ", 23),
    (*b"E8      ", 23),
    (*b"CLIPPER ", 23),
    (*b"TRAMCOMB", 23),
    (*b"COMET   ", 23),
    (*b"CONCOR  ", 23),
    (*b"TRAM3   ", 23),
    (*b"GRAINHP2", 23),
    (*b"GRAINHP1", 23),
    (*b"DC3     ", 23),
    (*b"DH16    ", 23),
    (*b"DASH7   ", 23),
    (*b"DEH46   ", 23),
    (*b"FERRY1  ", 23),
    (*b"EWIVDT  ", 23),
    (*b"EWIV    ", 23),
    (*b"EB35    ", 23),
    (*b"ESTAR2  ", 23),
    (*b"ESTAR1  ", 23),
    (*b"EMU1    ", 23),
    (*b"F27     ", 23),
    (*b"F7      ", 23),
    (*b"FTRUCK1 ", 23),
    (*b"FTRUCK2 ", 23),
    (*b"FTRUCK3 ", 23),
    (*b"FTRUCK4 ", 23),
    (*b"FLATBED1", 23),
    (*b"FLATBED2", 23),
    (*b"FLTBEDN1", 23),
    (*b"4F      ", 23),
    (*b"CLASSIC ", 23),
    (*b"GE442   ", 23),
    (*b"GE443   ", 23),
    (*b"GE66    ", 23),
    (*b"GTRUCK1 ", 23),
    (*b"GTRUCK2 ", 23),
    (*b"GTRUCK3 ", 23),
    (*b"GTRUCK4 ", 23),
    (*b"PVAN2   ", 23),
    (*b"GOODS1  ", 23),
    (*b"GOODSN1 ", 23),
    (*b"A3      ", 23),
    (*b"A4      ", 23),
    (*b"V2      ", 23),
    (*b"HGE44   ", 23),
    (*b"HGE442  ", 23),
    (*b"HST     ", 23),
    (*b"HTRUCK1 ", 23),
    (*b"HTRUCK2 ", 23),
    (*b"HTRUCK3 ", 23),
    (*b"HTRUCK4 ", 23),
    (*b"HOPPER  ", 23),
    (*b"HOPPER2 ", 23),
    (*b"HFOIL1  ", 23),
    (*b"JU52    ", 23),
    (*b"JFOIL1  ", 23),
    (*b"LEOP1   ", 23),
    (*b"CATTLEN1", 23),
    (*b"CATTLE1 ", 23),
    (*b"CATTLE3 ", 23),
    (*b"MAILUS1 ", 23),
    (*b"MAILUS2 ", 23),
    (*b"MTRUCK1 ", 23),
    (*b"MTRUCK2 ", 23),
    (*b"MTRUCK3 ", 23),
    (*b"CARGOSH2", 23),
    (*b"MK1     ", 23),
    (*b"MK2     ", 23),
    (*b"MK3     ", 23),
    (*b"36R     ", 23),
    (*b"OILSH   ", 23),
    (*b"USPACIF ", 23),
    (*b"PVAN1   ", 23),
    (*b"SWISS5  ", 23),
    (*b"PCAR1   ", 23),
    (*b"PCAR2   ", 23),
    (*b"PCARSW1 ", 23),
    (*b"PCARUS1 ", 23),
    (*b"PCARUS2 ", 23),
    (*b"SWISS1  ", 23),
    (*b"SWISS2  ", 23),
    (*b"SWISS3  ", 23),
    (*b"SWISS4  ", 23),
    (*b"MAILSW1 ", 23),
    (*b"MAILSW4 ", 23),
    (*b"RBE24   ", 23),
    (*b"RTMASTER", 23),
    (*b"RE441   ", 23),
    (*b"RE442   ", 23),
    (*b"460     ", 23),
    (*b"COPTER1 ", 23),
    (*b"SD70MAC ", 23),
    (*b"C33     ", 23),
    (*b"C56     ", 23),
    (*b"HG23    ", 23),
    (*b"HCRAFT1 ", 23),
    (*b"SHINKT0 ", 23),
    (*b"SHINKF0 ", 23),
    (*b"SPECIAL ", 23),
    (*b"BLACK5  ", 23),
    (*b"STANCORR", 23),
    (*b"JUBILEE ", 23),
    (*b"FERRY2  ", 23),
    (*b"ST8FT   ", 23),
    (*b"CATTLE2 ", 23),
    (*b"TDH5301 ", 23),
    (*b"TGV2    ", 23),
    (*b"TGV1    ", 23),
    (*b"TTRAIL2 ", 23),
    (*b"TTRUCK1 ", 23),
    (*b"TTRUCK2 ", 23),
    (*b"TTRUCK3 ", 23),
    (*b"TTRUCK4 ", 23),
    (*b"OIL1    ", 23),
    (*b"OIL2    ", 23),
    (*b"OILN1   ", 23),
    (*b"VISCOUNT", 23),
    (*b"VULCAN  ", 23),
    (*b"WMCBUS  ", 23),
    (*b"COAL1   ", 23),
    (*b"OPENN1  ", 23),
    (*b"BSPRUCE ", 24),
    (*b"CACTUS1 ", 24),
    (*b"CACTUS2 ", 24),
    (*b"CACTUS3 ", 24),
    (*b"LCEDAR  ", 24),
    (*b"CHESTNUT", 24),
    (*b"BEECH   ", 24),
    (*b"COPBEACH", 24),
    (*b"WILLOW  ", 24),
    (*b"DREDWOOD", 24),
    (*b"ELM     ", 24),
    (*b"FRISIA  ", 24),
    (*b"HCYPRESS", 24),
    (*b"GFIR    ", 24),
    (*b"HSTRAW  ", 24),
    (*b"IYEW    ", 24),
    (*b"ICYPRESS", 24),
    (*b"JAPCRAB ", 24),
    (*b"JOSHUA  ", 24),
    (*b"KBFIR   ", 24),
    (*b"NMAPLE  ", 24),
    (*b"NASH    ", 24),
    (*b"OAK     ", 24),
    (*b"PCYPRESS", 24),
    (*b"QPALM   ", 24),
    (*b"RCEDAR  ", 24),
    (*b"RFIR    ", 24),
    (*b"ROBINIA ", 24),
    (*b"SCPINE  ", 24),
    (*b"BIRCH   ", 24),
    (*b"BIRCH2  ", 24),
    (*b"SPALM   ", 24),
    (*b"SVPINE  ", 24),
    (*b"SNOWBELL", 24),
    (*b"SMAPLE  ", 24),
    (*b"SCYPRESS", 24),
    (*b"WASH    ", 24),
    (*b"YEW     ", 24),
    (*b"YUKKA   ", 24),
    (*b"SNOW    ", 25),
    (*b"CLIM1   ", 26),
    (*b"CLIM4   ", 26),
    (*b"CLIM2   ", 26),
    (*b"CLIM5   ", 26),
    (*b"CLIM3   ", 26),
    (*b"CLIM6   ", 26),
    (*b"HS1     ", 27),
    (*b"BLDALP8 ", 28),
    (*b"BLDALP1 ", 28),
    (*b"BLDHOU14", 28),
    (*b"BLDHOU18", 28),
    (*b"BLDCASTL", 28),
    (*b"BLDCRCH1", 28),
    (*b"BLDCRCH2", 28),
    (*b"BLDCRCH3", 28),
    (*b"HQ1     ", 28),
    (*b"BLDHALL1", 28),
    (*b"BLDALP3 ", 28),
    (*b"BLDHOU10", 28),
    (*b"BLDHOU20", 28),
    (*b"BLDHOUS4", 28),
    (*b"BLDHOUS6", 28),
    (*b"BLDHOUS7", 28),
    (*b"BLDHOUS9", 28),
    (*b"BLDALP2 ", 28),
    (*b"BLDHOUS8", 28),
    (*b"BLDCTY21", 28),
    (*b"BLDPYLON", 28),
    (*b"BLDCTY17", 28),
    (*b"BLDCTY20", 28),
    (*b"BLDFOUNT", 28),
    (*b"BLDCTY18", 28),
    (*b"BLDALP11", 28),
    (*b"BLDALP4 ", 28),
    (*b"BLDALP5 ", 28),
    (*b"BLDALP6 ", 28),
    (*b"BLDHOU12", 28),
    (*b"BLDHOU13", 28),
    (*b"BLDHOU15", 28),
    (*b"BLDHOU19", 28),
    (*b"BLDHOU21", 28),
    (*b"BLDHOU22", 28),
    (*b"BLDHOU24", 28),
    (*b"BLDHOU25", 28),
    (*b"BLDHOUS3", 28),
    (*b"BLDHOU23", 28),
    (*b"BLDLIGHT", 28),
    (*b"BLDCTY13", 28),
    (*b"BLDCTY19", 28),
    (*b"BLDCTY2 ", 28),
    (*b"BLDCTY28", 28),
    (*b"BLDCTY29", 28),
    (*b"BLDCTY3 ", 28),
    (*b"BLDCTY4 ", 28),
    (*b"BLDCTY5 ", 28),
    (*b"BLDCTY15", 28),
    (*b"BLDCTY12", 28),
    (*b"BLDCTY1 ", 28),
    (*b"BLDCTY10", 28),
    (*b"BLDCTY11", 28),
    (*b"BLDCTY14", 28),
    (*b"BLDCTY7 ", 28),
    (*b"BLDHOU11", 28),
    (*b"BLDALP10", 28),
    (*b"BLDSHOP1", 28),
    (*b"BLDCTY25", 28),
    (*b"BLDCTY26", 28),
    (*b"BLDCTY27", 28),
    (*b"BLDCTY6 ", 28),
    (*b"BLDCTY8 ", 28),
    (*b"BLDCTY9 ", 28),
    (*b"BLDHOU16", 28),
    (*b"BLDCTY16", 28),
    (*b"BLDCTY22", 28),
    (*b"BLDCTY23", 28),
    (*b"BLDCTY24", 28),
    (*b"BLDHOU17", 28),
    (*b"BLDHOUS2", 28),
    (*b"BLDOFF1 ", 28),
    (*b"BLDPARK1", 28),
    (*b"BLDALP7 ", 28),
    (*b"BLDALP9 ", 28),
    (*b"BLDTRANS", 28),
    (*b"SCAFDEF ", 29),
    (*b"BREWERY ", 30),
    (*b"CHEMWORK", 30),
    (*b"COALMINE", 30),
    (*b"COALPS  ", 30),
    (*b"FACTORY ", 30),
    (*b"WINDMILL", 30),
    (*b"FOODPROC", 30),
    (*b"OREMINE ", 30),
    (*b"STOCKFRM", 30),
    (*b"FOREST  ", 30),
    (*b"OILREFIN", 30),
    (*b"OILRIG  ", 30),
    (*b"OILWELL ", 30),
    (*b"PAPERMIL", 30),
    (*b"PRINTWRK", 30),
    (*b"SAWMILL ", 30),
    (*b"SKICENT ", 30),
    (*b"STEELMIL", 30),
    (*b"VINEYARD", 30),
    (*b"FARM    ", 30),
    (*b"FARMUS  ", 30),
    (*b"WINERY  ", 30),
    (*b"REGALP  ", 31),
    (*b"REGUK   ", 31),
    (*b"REGUS   ", 31),
    (*b"COMP9   ", 32),
    (*b"COMP5   ", 32),
    (*b"COMP22  ", 32),
    (*b"COMP28  ", 32),
    (*b"COMP23  ", 32),
    (*b"COMP10  ", 32),
    (*b"COMP6   ", 32),
    (*b"COMP27  ", 32),
    (*b"COMP7   ", 32),
    (*b"COMP20  ", 32),
    (*b"COMP21  ", 32),
    (*b"COMP12  ", 32),
    (*b"COMP33  ", 32),
    (*b"COMP24  ", 32),
    (*b"COMP4   ", 32),
    (*b"COMP13  ", 32),
    (*b"COMP18  ", 32),
    (*b"COMP8   ", 32),
    (*b"COMP2   ", 32),
    (*b"COMP14  ", 32),
    (*b"COMP15  ", 32),
    (*b"COMP30  ", 32),
    (*b"COMP16  ", 32),
    (*b"COMP26  ", 32),
    (*b"COMP29  ", 32),
    (*b"COMP34  ", 32),
    (*b"COMP35  ", 32),
    (*b"COMP32  ", 32),
    (*b"COMP17  ", 32),
    (*b"COMP38  ", 32),
    (*b"COMP1   ", 32),
    (*b"COMP3   ", 32),
    (*b"COMP36  ", 32),
    (*b"COMP31  ", 32),
    (*b"COMP25  ", 32),
    (*b"COMP37  ", 32),
    (*b"COMP11  ", 32),
    (*b"COMP19  ", 32),
    (*b"STEX043 ", 33),
    (*b"STEX024 ", 33),
    (*b"STEX038 ", 33),
    (*b"STEX040 ", 33),
    (*b"STEX021 ", 33),
    (*b"STEX025 ", 33),
    (*b"STEX022 ", 33),
    (*b"STEX036 ", 33),
    (*b"STEX003 ", 33),
    (*b"STEX000 ", 33),
    (*b"STEX001 ", 33),
    (*b"STEX002 ", 33),
    (*b"STEX034 ", 33),
    (*b"STEX030 ", 33),
    (*b"STEX027 ", 33),
    (*b"STEX023 ", 33),
    (*b"STEX007 ", 33),
    (*b"STEX004 ", 33),
    (*b"STEX005 ", 33),
    (*b"STEX006 ", 33),
    (*b"STEX011 ", 33),
    (*b"STEX008 ", 33),
    (*b"STEX009 ", 33),
    (*b"STEX010 ", 33),
    (*b"STEX015 ", 33),
    (*b"STEX012 ", 33),
    (*b"STEX013 ", 33),
    (*b"STEX014 ", 33),
    (*b"STEX031 ", 33),
    (*b"STEX041 ", 33),
    (*b"STEX020 ", 33),
    (*b"STEX042 ", 33),
    (*b"STEX037 ", 33),
    (*b"STEX028 ", 33),
    (*b"STEX032 ", 33),
    (*b"STEX039 ", 33),
    (*b"STEX033 ", 33),
    (*b"STEX019 ", 33),
    (*b"STEX016 ", 33),
    (*b"STEX017 ", 33),
    (*b"STEX018 ", 33),
    (*b"STEX026 ", 33),
    (*b"STEX035 ", 33),
    (*b"STEX044 ", 33),
    (*b"STEX029 ", 33),
];

fn vanilla_set() -> &'static FxHashSet<([u8; 8], u8)> {
    static SET: OnceLock<FxHashSet<([u8; 8], u8)>> = OnceLock::new();
    SET.get_or_init(|| VANILLA_OBJECTS.iter().copied().collect())
}

/// Check whether `(name, type_tag)` names a built-in object.
pub fn is_vanilla(name: &[u8; 8], type_tag: u8) -> bool {
    vanilla_set().contains(&(*name, type_tag))
}

/// Number of built-in objects.
pub fn vanilla_count() -> usize {
    VANILLA_OBJECTS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_entries() {
        assert!(is_vanilla(b"INTERDEF", 0));
        assert!(is_vanilla(b"SNDA1   ", 1));
        assert!(!is_vanilla(b"INTERDEF", 1));
        assert!(!is_vanilla(b"MYCUSTOM", 23));
    }

    #[test]
    fn test_no_duplicates() {
        assert_eq!(vanilla_set().len(), vanilla_count());
    }
}
